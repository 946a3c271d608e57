use std::fmt;

use crate::types::NoticeListParams;

/// Resource family a cached query belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Notice,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Notice => "notices",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryScope {
    List(NoticeListParams),
    Detail(i64),
}

/// Identity of a cached response: (kind, list params) or (kind, id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: EntityKind,
    pub scope: QueryScope,
}

impl QueryKey {
    pub fn list(kind: EntityKind, params: NoticeListParams) -> Self {
        Self {
            kind,
            scope: QueryScope::List(params),
        }
    }

    pub fn detail(kind: EntityKind, id: i64) -> Self {
        Self {
            kind,
            scope: QueryScope::Detail(id),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.scope, QueryScope::List(_))
    }

    pub fn is_detail(&self) -> bool {
        matches!(self.scope, QueryScope::Detail(_))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            QueryScope::List(p) => write!(
                f,
                "{}/list?platform={}&page={}&size={}",
                self.kind.as_str(),
                p.platform,
                p.page,
                p.size
            ),
            QueryScope::Detail(id) => write!(f, "{}/detail/{}", self.kind.as_str(), id),
        }
    }
}

/// Selects a group of keys, from a whole entity kind down to one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFilter {
    All(EntityKind),
    Lists(EntityKind),
    Details(EntityKind),
    Exact(QueryKey),
}

impl QueryFilter {
    pub fn kind(&self) -> EntityKind {
        match self {
            QueryFilter::All(kind) | QueryFilter::Lists(kind) | QueryFilter::Details(kind) => *kind,
            QueryFilter::Exact(key) => key.kind,
        }
    }

    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            QueryFilter::All(kind) => key.kind == *kind,
            QueryFilter::Lists(kind) => key.kind == *kind && key.is_list(),
            QueryFilter::Details(kind) => key.kind == *kind && key.is_detail(),
            QueryFilter::Exact(exact) => exact == key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlatformFilter;

    #[test]
    fn test_filters_select_by_scope() {
        let list = QueryKey::list(EntityKind::Notice, NoticeListParams::new(PlatformFilter::Web, 2, 10));
        let detail = QueryKey::detail(EntityKind::Notice, 42);

        assert!(QueryFilter::Lists(EntityKind::Notice).matches(&list));
        assert!(!QueryFilter::Lists(EntityKind::Notice).matches(&detail));
        assert!(QueryFilter::All(EntityKind::Notice).matches(&detail));
        assert!(QueryFilter::Exact(detail).matches(&QueryKey::detail(EntityKind::Notice, 42)));
        assert!(!QueryFilter::Exact(detail).matches(&QueryKey::detail(EntityKind::Notice, 43)));
    }

    #[test]
    fn test_key_display() {
        let list = QueryKey::list(EntityKind::Notice, NoticeListParams::new(PlatformFilter::All, 0, 10));
        assert_eq!(list.to_string(), "notices/list?platform=ALL&page=0&size=10");
        assert_eq!(QueryKey::detail(EntityKind::Notice, 5).to_string(), "notices/detail/5");
    }
}
