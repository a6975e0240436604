use crate::errors::HillCryptoError;
use crate::ring::{Matrix, Ring, Vector};

/// A·x where A is an m×n matrix and x is a length–n vector.
/// Returns an m‐vector.
pub fn matrix_vector_mul(a: &Matrix, x: &[i64], ring: &Ring) -> Result<Vector, HillCryptoError> {
    let m = a.len();
    if m == 0 {
        return Ok(Vec::new());
    }
    let n = a[0].len();
    if x.len() != n {
        return Err(HillCryptoError::DimensionMismatch(format!(
            "Matrix columns ({}) must match vector length ({})",
            n,
            x.len()
        )));
    }

    let mut y = vec![0i64; m];
    for (i, row) in a.iter().enumerate() {
        if row.len() != n {
            return Err(HillCryptoError::DimensionMismatch(format!(
                "Row {} has length {} but expected {}",
                i,
                row.len(),
                n
            )));
        }
        let mut sum = 0i64;
        for (&a_ij, &x_j) in row.iter().zip(x) {
            sum = ring.add(sum, ring.mul(a_ij, x_j));
        }
        y[i] = sum;
    }
    Ok(y)
}

/// Computes the matrix product `C = AB` modulo `m`, where `m` is the modulus of the ring.
///
/// # Errors
///
/// Returns `HillCryptoError::DimensionMismatch` if the inner dimensions of the matrices do not match
/// or if rows within the matrices have inconsistent lengths.
pub fn matrix_mul(a: &Matrix, b: &Matrix, ring: &Ring) -> Result<Matrix, HillCryptoError> {
    let n = a.len();
    if n == 0 {
        return Ok(Matrix::new());
    }
    let m_common = a[0].len();
    if b.len() != m_common {
        return Err(HillCryptoError::DimensionMismatch(format!(
            "Inner dimensions must match for matrix multiplication ({} vs {})",
            m_common,
            b.len()
        )));
    }
    let p = b.first().map_or(0, Vec::len);
    if let Some(k) = b.iter().position(|row| row.len() != p) {
        return Err(HillCryptoError::DimensionMismatch(format!(
            "Matrix B row {} has incorrect length (expected {})",
            k, p
        )));
    }

    let mut c = vec![vec![0; p]; n];
    for i in 0..n {
        if a[i].len() != m_common {
            return Err(HillCryptoError::DimensionMismatch(format!(
                "Matrix A row {} has incorrect length (expected {})",
                i, m_common
            )));
        }
        for j in 0..p {
            let mut sum = 0i64;
            for k in 0..m_common {
                sum = ring.add(sum, ring.mul(a[i][k], b[k][j]));
            }
            c[i][j] = sum;
        }
    }
    Ok(c)
}

/// Creates an identity matrix of size `n`.
pub fn identity_matrix(n: usize) -> Matrix {
    let mut identity = vec![vec![0; n]; n];
    for (i, row) in identity.iter_mut().enumerate() {
        row[i] = 1;
    }
    identity
}

/// Transposes a rectangular matrix.
pub fn transpose(matrix: &Matrix) -> Matrix {
    let cols = matrix.first().map_or(0, Vec::len);
    (0..cols)
        .map(|j| matrix.iter().map(|row| row[j]).collect())
        .collect()
}

/// Returns the size `n` of an n×n matrix.
///
/// An empty matrix is accepted as the 0×0 matrix.
pub fn ensure_square(matrix: &Matrix) -> Result<usize, HillCryptoError> {
    let n = matrix.len();
    if let Some((i, row)) = matrix.iter().enumerate().find(|(_, row)| row.len() != n) {
        return Err(HillCryptoError::DimensionMismatch(format!(
            "Matrix must be square: row {} has length {} but expected {}",
            i,
            row.len(),
            n
        )));
    }
    Ok(n)
}

/// Reduces every entry into `[0, m)`.
pub fn reduce_matrix(matrix: &Matrix, ring: &Ring) -> Matrix {
    matrix
        .iter()
        .map(|row| row.iter().map(|&v| ring.normalize(v)).collect())
        .collect()
}

/// Multiplies every entry by `k` modulo `m`.
pub fn scale_matrix(matrix: &Matrix, k: i64, ring: &Ring) -> Matrix {
    matrix
        .iter()
        .map(|row| row.iter().map(|&v| ring.mul(v, k)).collect())
        .collect()
}

/// Returns a copy of `matrix` with row `row` and column `col` removed.
pub fn submatrix(matrix: &Matrix, row: usize, col: usize) -> Matrix {
    matrix
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != row)
        .map(|(_, r)| {
            r.iter()
                .enumerate()
                .filter(|&(j, _)| j != col)
                .map(|(_, &v)| v)
                .collect()
        })
        .collect()
}
