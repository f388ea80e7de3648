/// Page window for list queries. A club roster is small; the default is
/// generous enough that the admin console rarely pages at all.
#[derive(Debug, Clone, Copy)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

impl Default for LimitOffset {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
        }
    }
}

impl LimitOffset {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let d = Self::default();
        Self {
            limit: limit.unwrap_or(d.limit).clamp(1, 500),
            offset: offset.unwrap_or(d.offset).max(0),
        }
    }
}
