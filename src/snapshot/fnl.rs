//! Flattened node list (`.fnl`) snapshot reader.
//!
//! A flattened node list is a whitespace separated numeric table with one row
//! per particle and 15 columns:
//!
//! ```text
//! id  eos  x  y  z  vx  vy  vz  m  rho  P  T  U  hmin  hmax
//! ```
//!
//! Several node lists may be flattened into one file; rows are grouped by the
//! integer list id in column 0. Blank lines and `#` comments are skipped.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::analysis::states::{NVec3, ParticleCloud};
use crate::error::SnapshotError;

/// Column layout of a flattened node list
pub struct FnlColumns;

impl FnlColumns {
    pub const COUNT: usize = 15;
    pub const LIST_ID: usize = 0;
    pub const EOS_ID: usize = 1;
    pub const X: usize = 2;
    pub const VX: usize = 5;
    pub const M: usize = 8;
    pub const RHO: usize = 9;
    pub const P: usize = 10;
    pub const T: usize = 11;
    pub const U: usize = 12;
    pub const HMIN: usize = 13;
    pub const HMAX: usize = 14;
}

/// All particles of one node list, column by column
#[derive(Debug, Clone, Default)]
pub struct NodeList {
    pub id: usize,
    pub eos: Vec<f64>, // material / equation of state id
    pub pos: Vec<NVec3>,
    pub vel: Vec<NVec3>,
    pub m: Vec<f64>,
    pub rho: Vec<f64>, // density
    pub p: Vec<f64>, // pressure
    pub temp: Vec<f64>, // temperature
    pub u: Vec<f64>, // specific internal energy
    pub hmin: Vec<f64>, // smoothing length bounds
    pub hmax: Vec<f64>,
}

impl NodeList {
    fn new(id: usize) -> Self {
        Self { id, ..Default::default() }
    }

    pub fn len(&self) -> usize {
        self.m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }

    fn push_row(&mut self, row: &[f64]) {
        let vec3 = |c: usize| NVec3::new(row[c], row[c + 1], row[c + 2]);
        self.eos.push(row[FnlColumns::EOS_ID]);
        self.pos.push(vec3(FnlColumns::X));
        self.vel.push(vec3(FnlColumns::VX));
        self.m.push(row[FnlColumns::M]);
        self.rho.push(row[FnlColumns::RHO]);
        self.p.push(row[FnlColumns::P]);
        self.temp.push(row[FnlColumns::T]);
        self.u.push(row[FnlColumns::U]);
        self.hmin.push(row[FnlColumns::HMIN]);
        self.hmax.push(row[FnlColumns::HMAX]);
    }

    /// The kinematic columns as a cloud for the solver
    pub fn cloud(&self) -> ParticleCloud {
        ParticleCloud::new(self.pos.clone(), self.vel.clone(), self.m.clone())
    }
}

/// Flatten several node lists into one cloud, keeping list order
pub fn merge_clouds(lists: &[NodeList]) -> ParticleCloud {
    let mut cloud = ParticleCloud::default();
    for nl in lists {
        cloud.pos.extend_from_slice(&nl.pos);
        cloud.vel.extend_from_slice(&nl.vel);
        cloud.m.extend_from_slice(&nl.m);
    }
    cloud
}

/// Read a flattened node list file
pub fn load_fnl(path: &Path) -> Result<Vec<NodeList>, SnapshotError> {
    let file = File::open(path)?;
    let lists = parse_fnl(BufReader::new(file))?;
    debug!(path = %path.display(), lists = lists.len(), "snapshot loaded");
    Ok(lists)
}

/// Parse flattened node list text into node lists ordered by id.
/// Ids without rows are omitted
pub fn parse_fnl<R: Read>(reader: R) -> Result<Vec<NodeList>, SnapshotError> {
    let mut lists: BTreeMap<usize, NodeList> = BTreeMap::new();
    let mut row = Vec::with_capacity(FnlColumns::COUNT);

    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let data = line.split('#').next().unwrap_or("").trim();
        if data.is_empty() {
            continue;
        }

        row.clear();
        for (column, token) in data.split_whitespace().enumerate() {
            let value = token.parse::<f64>().map_err(|_| SnapshotError::Parse {
                line: line_no,
                column,
                token: token.to_string(),
            })?;
            row.push(value);
        }
        if row.len() != FnlColumns::COUNT {
            return Err(SnapshotError::ColumnCount {
                line: line_no,
                found: row.len(),
                expected: FnlColumns::COUNT,
            });
        }

        let id_value = row[FnlColumns::LIST_ID];
        if !(id_value >= 0.0 && id_value.fract() == 0.0 && id_value.is_finite()) {
            return Err(SnapshotError::BadListId { line: line_no, value: id_value });
        }
        let id = id_value as usize;
        lists.entry(id).or_insert_with(|| NodeList::new(id)).push_row(&row);
    }

    if lists.is_empty() {
        return Err(SnapshotError::Empty);
    }
    Ok(lists.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_LISTS: &str = "\
# id eos x y z vx vy vz m rho P T U hmin hmax
0 1  0.0 0.0 0.0  0.0 0.0 0.0  2.0  1.0 0.0 300.0 0.0 0.1 0.2
1 2  1.0 0.0 0.0  0.0 1.0 0.0  3.0  1.0 0.0 300.0 0.0 0.1 0.2

0 1  0.0 1.0 0.0  0.0 0.0 0.5  4.0  1.0 0.0 300.0 0.0 0.1 0.2
";

    #[test]
    fn groups_rows_by_list_id() {
        let lists = parse_fnl(TWO_LISTS.as_bytes()).unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].id, 0);
        assert_eq!(lists[0].len(), 2);
        assert_eq!(lists[1].len(), 1);
        assert_eq!(lists[0].m, vec![2.0, 4.0]);
        assert_eq!(lists[1].vel[0], NVec3::new(0.0, 1.0, 0.0));
        assert_eq!(lists[1].eos[0], 2.0);
    }

    #[test]
    fn merged_cloud_keeps_list_order() {
        let lists = parse_fnl(TWO_LISTS.as_bytes()).unwrap();
        let cloud = merge_clouds(&lists);
        assert_eq!(cloud.m, vec![2.0, 4.0, 3.0]);
        assert!(cloud.validate().is_ok());
    }

    #[test]
    fn wrong_column_count_is_rejected() {
        let err = parse_fnl("0 1 0.0 0.0 0.0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SnapshotError::ColumnCount { line: 1, found: 5, expected: 15 }));
    }

    #[test]
    fn bad_token_is_rejected() {
        let text = "0 1 0 0 0 0 0 0 abc 1 0 0 0 0 0\n";
        let err = parse_fnl(text.as_bytes()).unwrap_err();
        assert!(matches!(err, SnapshotError::Parse { line: 1, column: 8, .. }));
    }

    #[test]
    fn fractional_list_id_is_rejected() {
        let text = "0.5 1 0 0 0 0 0 0 1 1 0 0 0 0 0\n";
        let err = parse_fnl(text.as_bytes()).unwrap_err();
        assert!(matches!(err, SnapshotError::BadListId { line: 1, .. }));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = parse_fnl("# nothing here\n\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SnapshotError::Empty));
    }
}
