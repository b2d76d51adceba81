//! Circular prev/next lookup over the ordered dish identifiers.

use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacent {
    pub prev: String,
    pub next: String,
}

/// Find the dishes before and after `current`, wrapping around both ends of `ids`.
pub fn compute_adjacent<S: AsRef<str>>(ids: &[S], current: &str) -> Result<Adjacent, Error> {
    let n = ids.len();
    if n == 0 {
        return Err(Error::EmptyMenu);
    }

    let index = ids
        .iter()
        .position(|id| id.as_ref() == current)
        .ok_or_else(|| Error::NotFound(current.to_string()))?;

    Ok(Adjacent {
        prev: ids[(n + index - 1) % n].as_ref().to_string(),
        next: ids[(index + 1) % n].as_ref().to_string(),
    })
}

/// Collects the id list and the current id, which may arrive in any order,
/// and resolves the adjacent pair once both are known.
#[derive(Debug, Default)]
pub struct Navigator {
    ids: Option<Vec<String>>,
    current: Option<String>,
    adjacent: Option<Adjacent>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ids(&mut self, ids: Vec<String>) -> Option<Result<&Adjacent, Error>> {
        self.ids = Some(ids);
        self.resolve()
    }

    pub fn set_current(&mut self, id: impl Into<String>) -> Option<Result<&Adjacent, Error>> {
        self.current = Some(id.into());
        self.resolve()
    }

    pub fn adjacent(&self) -> Option<&Adjacent> {
        self.adjacent.as_ref()
    }

    fn resolve(&mut self) -> Option<Result<&Adjacent, Error>> {
        let (Some(ids), Some(current)) = (&self.ids, &self.current) else {
            return None;
        };

        match compute_adjacent(ids, current) {
            Ok(adjacent) => Some(Ok(&*self.adjacent.insert(adjacent))),
            Err(e) => {
                // a stale pair would point at the wrong neighbours
                self.adjacent = None;
                Some(Err(e))
            }
        }
    }
}
