use serde::{Deserialize, Serialize};

/// One page of a list answer.
///
/// `total` counts every matching item, not only the ones in `value`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPage<T> {
    pub value: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
}

impl<T> Default for DataPage<T> {
    fn default() -> Self {
        Self {
            value: Vec::new(),
            total: 0,
            skip: 0,
        }
    }
}
