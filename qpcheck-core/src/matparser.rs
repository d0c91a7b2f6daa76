//! MAT-file benchmark loader.
//!
//! Reads QP benchmark problems stored as MATLAB v5 .mat files with named
//! fields {Q, c, A, rl, ru, lb, ub} and converts them to the canonical
//! two-sided-bound form. The conversion appends an identity block beneath
//! the general constraint rows so that per-variable box bounds become
//! ordinary rows, the only constraint form downstream adapters handle.

use std::fs;
use std::path::Path;

use matfile::{MatFile, NumericData};

use crate::error::{HarnessError, HarnessResult};
use crate::linalg::sparse;
use crate::problem::QpProblem;

/// Magnitudes at or above this encode "no bound" in benchmark files.
const INF_THRESH: f64 = 1e20;

/// Raw benchmark problem data as stored in the file.
///
/// ```text
/// minimize    (1/2) x^T Q x + c^T x
/// subject to  rl <= A x <= ru,  lb <= x <= ub
/// ```
#[derive(Debug, Clone)]
pub struct MatQpData {
    /// Problem name (file stem)
    pub name: String,
    /// Number of variables (side of Q)
    pub n: usize,
    /// Number of general constraint rows
    pub m0: usize,
    /// Objective matrix Q
    pub q_triplets: Vec<(usize, usize, f64)>,
    /// Linear cost c
    pub c: Vec<f64>,
    /// General constraint matrix
    pub a_triplets: Vec<(usize, usize, f64)>,
    /// General row lower bounds
    pub rl: Vec<f64>,
    /// General row upper bounds
    pub ru: Vec<f64>,
    /// Variable lower bounds
    pub lb: Vec<f64>,
    /// Variable upper bounds
    pub ub: Vec<f64>,
}

impl MatQpData {
    /// Convert to a canonical problem.
    ///
    /// Builds `A = [A_raw; I_n]` with bounds `l = [rl; lb]`, `u = [ru; ub]`,
    /// folding variable box bounds into the same row-bound formalism as the
    /// general constraints.
    pub fn into_problem(self) -> HarnessResult<QpProblem> {
        let check_len = |field: &str, got: usize, want: usize| -> HarnessResult<()> {
            if got != want {
                return Err(HarnessError::Format {
                    field: field.to_string(),
                    message: format!("has length {}, expected {}", got, want),
                });
            }
            Ok(())
        };

        check_len("c", self.c.len(), self.n)?;
        check_len("rl", self.rl.len(), self.m0)?;
        check_len("ru", self.ru.len(), self.m0)?;
        check_len("lb", self.lb.len(), self.n)?;
        check_len("ub", self.ub.len(), self.n)?;

        let p = sparse::from_triplets(self.n, self.n, self.q_triplets);
        let a_raw = sparse::from_triplets(self.m0, self.n, self.a_triplets);
        let a = sparse::vstack(&a_raw, &sparse::identity(self.n));

        let l: Vec<f64> = self
            .rl
            .iter()
            .chain(self.lb.iter())
            .map(|&v| coerce_inf(v))
            .collect();
        let u: Vec<f64> = self
            .ru
            .iter()
            .chain(self.ub.iter())
            .map(|&v| coerce_inf(v))
            .collect();

        QpProblem::new(p, self.c, a, l, u)
    }
}

fn coerce_inf(v: f64) -> f64 {
    if v >= INF_THRESH {
        f64::INFINITY
    } else if v <= -INF_THRESH {
        f64::NEG_INFINITY
    } else {
        v
    }
}

/// Parse a MAT file containing fields {Q, c, A, rl, ru, lb, ub}.
pub fn parse_mat<P: AsRef<Path>>(path: P) -> HarnessResult<MatQpData> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();

    let file = fs::File::open(path).map_err(|e| HarnessError::Format {
        field: "file".to_string(),
        message: format!("cannot open {}: {}", path.display(), e),
    })?;
    let mat = MatFile::parse(file).map_err(|e| HarnessError::Format {
        field: "file".to_string(),
        message: format!("cannot parse {}: {}", path.display(), e),
    })?;

    let (q_rows, q_cols, q_triplets) = get_matrix(&mat, "Q")?;
    if q_rows != q_cols {
        return Err(HarnessError::Format {
            field: "Q".to_string(),
            message: format!("has shape {}x{}, expected square", q_rows, q_cols),
        });
    }
    let n = q_rows;

    let c = get_vector(&mat, "c")?;

    let (m0, a_cols, a_triplets) = get_matrix(&mat, "A")?;
    if a_cols != n {
        return Err(HarnessError::Format {
            field: "A".to_string(),
            message: format!("has {} cols, expected {}", a_cols, n),
        });
    }

    let rl = get_vector(&mat, "rl")?;
    let ru = get_vector(&mat, "ru")?;
    let lb = get_vector(&mat, "lb")?;
    let ub = get_vector(&mat, "ub")?;

    Ok(MatQpData {
        name,
        n,
        m0,
        q_triplets,
        c,
        a_triplets,
        rl,
        ru,
        lb,
        ub,
    })
}

/// Extract a dense vector by name.
fn get_vector(mat: &MatFile, name: &str) -> HarnessResult<Vec<f64>> {
    let array = mat.find_by_name(name).ok_or_else(|| HarnessError::Format {
        field: name.to_string(),
        message: "missing array".to_string(),
    })?;

    match array.data() {
        NumericData::Double { real, .. } => Ok(real.clone()),
        NumericData::Single { real, .. } => Ok(real.iter().map(|&x| x as f64).collect()),
        _ => Err(HarnessError::Format {
            field: name.to_string(),
            message: "unsupported numeric type for vector".to_string(),
        }),
    }
}

/// Extract a matrix by name as (nrows, ncols, triplets).
///
/// The matfile crate skips sparse-stored arrays, so those show up as
/// missing; dense matrices are converted to triplets, dropping zeros.
fn get_matrix(mat: &MatFile, name: &str) -> HarnessResult<(usize, usize, Vec<(usize, usize, f64)>)> {
    let array = mat.find_by_name(name).ok_or_else(|| HarnessError::Format {
        field: name.to_string(),
        message: "missing array (sparse-stored matrices are not supported)".to_string(),
    })?;

    let shape = array.size();
    if shape.len() != 2 {
        return Err(HarnessError::Format {
            field: name.to_string(),
            message: format!("expected 2D array, got {}D", shape.len()),
        });
    }
    let nrows = shape[0];
    let ncols = shape[1];

    let values: Vec<f64> = match array.data() {
        NumericData::Double { real, .. } => real.clone(),
        NumericData::Single { real, .. } => real.iter().map(|&x| x as f64).collect(),
        _ => {
            return Err(HarnessError::Format {
                field: name.to_string(),
                message: "unsupported numeric type for matrix".to_string(),
            })
        }
    };

    let mut triplets = Vec::new();
    for col in 0..ncols {
        for row in 0..nrows {
            let val = values[row + col * nrows]; // column-major
            if val.abs() > 1e-20 {
                triplets.push((row, col, val));
            }
        }
    }
    Ok((nrows, ncols, triplets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_data() -> MatQpData {
        // 3 general rows over 2 variables
        MatQpData {
            name: "sample".to_string(),
            n: 2,
            m0: 3,
            q_triplets: vec![(0, 0, 2.0), (1, 1, 2.0)],
            c: vec![1.0, -1.0],
            a_triplets: vec![
                (0, 0, 1.0),
                (0, 1, 1.0),
                (1, 0, 1.0),
                (2, 1, -1.0),
            ],
            rl: vec![1.0, -1e21, 0.0],
            ru: vec![1.0, 2.0, 1e21],
            lb: vec![0.0, 0.0],
            ub: vec![0.7, 0.7],
        }
    }

    #[test]
    fn test_augmentation_shape() {
        let prob = sample_data().into_problem().unwrap();
        assert_eq!(prob.n(), 2);
        assert_eq!(prob.m(), 5); // 3 general rows + 2 identity rows
        assert_eq!(prob.l().len(), 5);
        assert_eq!(prob.u().len(), 5);
    }

    #[test]
    fn test_augmentation_identity_block() {
        let prob = sample_data().into_problem().unwrap();
        let mut identity_entries = 0;
        for (&val, (row, col)) in prob.a().iter() {
            if row >= 3 {
                assert_eq!(row - 3, col);
                assert_eq!(val, 1.0);
                identity_entries += 1;
            }
        }
        assert_eq!(identity_entries, 2);
        // Variable bounds land behind the general row bounds
        assert_eq!(&prob.l()[3..], &[0.0, 0.0]);
        assert_eq!(&prob.u()[3..], &[0.7, 0.7]);
    }

    #[test]
    fn test_infinity_coercion() {
        let prob = sample_data().into_problem().unwrap();
        assert_eq!(prob.l()[1], f64::NEG_INFINITY);
        assert_eq!(prob.u()[2], f64::INFINITY);
        assert!(prob.l()[0].is_finite());
    }

    #[test]
    fn test_cost_length_mismatch() {
        let mut data = sample_data();
        data.c = vec![1.0];
        let err = data.into_problem().unwrap_err();
        match err {
            HarnessError::Format { field, .. } => assert_eq!(field, "c"),
            other => panic!("expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_row_bound_length_mismatch() {
        let mut data = sample_data();
        data.ru = vec![1.0, 2.0];
        let err = data.into_problem().unwrap_err();
        match err {
            HarnessError::Format { field, .. } => assert_eq!(field, "ru"),
            other => panic!("expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_bounds_propagate() {
        let mut data = sample_data();
        data.rl[0] = 2.0; // above ru[0] = 1.0
        let err = data.into_problem().unwrap_err();
        assert!(matches!(err, HarnessError::Dimension(_)));
    }

    #[test]
    fn test_parse_rejects_non_mat_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is not a MAT file").unwrap();
        let err = parse_mat(file.path()).unwrap_err();
        assert!(matches!(err, HarnessError::Format { .. }));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_mat("does/not/exist.mat").unwrap_err();
        match err {
            HarnessError::Format { field, .. } => assert_eq!(field, "file"),
            other => panic!("expected Format error, got {:?}", other),
        }
    }
}
