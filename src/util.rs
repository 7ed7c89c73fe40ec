use nalgebra::{DMatrix, SymmetricEigen};

#[derive(Clone, Debug)]
pub(crate) struct UnionFind {
    pub(crate) parent: Vec<usize>,
    pub(crate) size: Vec<usize>,
}

impl UnionFind {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    pub(crate) fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression.
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }

        // Union by size.
        let (mut big, mut small) = (ra, rb);
        if self.size[big] < self.size[small] {
            std::mem::swap(&mut big, &mut small);
        }

        self.parent[small] = big;
        self.size[big] += self.size[small];
        big
    }

    /// Number of disjoint sets.
    pub(crate) fn components(&mut self) -> usize {
        (0..self.parent.len()).filter(|&i| self.find(i) == i).count()
    }
}

#[inline]
pub(crate) fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[inline]
pub(crate) fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// Dense symmetric matrix of Euclidean distances between rows.
pub(crate) fn pairwise_distances(data: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = data.len();
    let mut out = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = euclidean(&data[i], &data[j]);
            out[i][j] = d;
            out[j][i] = d;
        }
    }
    out
}

/// Indices of the `k` nearest other points to `i`, closest first.
///
/// Ties are broken by index so the result is deterministic.
pub(crate) fn k_nearest(dist: &[Vec<f64>], i: usize, k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..dist.len()).filter(|&j| j != i).collect();
    order.sort_by(|&a, &b| dist[i][a].total_cmp(&dist[i][b]).then(a.cmp(&b)));
    order.truncate(k);
    order
}

/// Eigenpairs of a symmetric matrix sorted by eigenvalue.
///
/// Returns `(eigenvalue, eigenvector)` pairs in ascending order when
/// `ascending` is set, descending otherwise.
pub(crate) fn sorted_eigenpairs(m: DMatrix<f64>, ascending: bool) -> Vec<(f64, Vec<f64>)> {
    let eig = SymmetricEigen::new(m);
    let mut pairs: Vec<(f64, Vec<f64>)> = eig
        .eigenvalues
        .iter()
        .enumerate()
        .map(|(c, &val)| (val, eig.eigenvectors.column(c).iter().copied().collect()))
        .collect();
    pairs.sort_by(|a, b| {
        let ord = a.0.total_cmp(&b.0);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
    pairs
}
