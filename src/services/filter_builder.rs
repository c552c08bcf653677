use crate::{
    errors::{AppError, AppResult},
    models::{domain::Question, dto::request::FilterParams},
};

pub const MAX_PAGE_SIZE: u64 = 100;
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Validated description of a catalog read. Only [`CatalogFilterBuilder`]
/// constructs one, and nothing mutates it afterwards. Results are always
/// ordered by `ques_number` ascending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterSpec {
    topic: Option<String>,
    difficulty: Option<String>,
    source: Option<String>,
    q_type: Option<i16>,
    offset: u64,
    limit: u64,
}

impl FilterSpec {
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn difficulty(&self) -> Option<&str> {
        self.difficulty.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn q_type(&self) -> Option<i16> {
        self.q_type
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Exact-equality AND over every provided filter; pagination is ignored.
    pub fn matches(&self, question: &Question) -> bool {
        self.topic().map_or(true, |t| question.topic == t)
            && self.difficulty().map_or(true, |d| question.difficulty == d)
            && self.source().map_or(true, |s| question.source == s)
            && self.q_type.map_or(true, |q| question.q_type == q)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CatalogFilterBuilder {
    max_page_size: u64,
    default_page_size: u64,
}

impl Default for CatalogFilterBuilder {
    fn default() -> Self {
        Self::new(MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE)
    }
}

impl CatalogFilterBuilder {
    pub fn new(max_page_size: u64, default_page_size: u64) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            max_page_size,
            default_page_size: default_page_size.clamp(1, max_page_size),
        }
    }

    pub fn max_page_size(&self) -> u64 {
        self.max_page_size
    }

    /// Pagination never fails: unparseable values fall back to defaults and
    /// out-of-range values are clamped into `[1, max_page_size]` / `>= 0`.
    /// A non-integer `q_type` is a validation error since it names a filter.
    pub fn build(&self, params: &FilterParams) -> AppResult<FilterSpec> {
        let q_type = match non_empty(&params.q_type) {
            Some(raw) => Some(raw.parse::<i16>().map_err(|_| {
                AppError::ValidationError(format!("q_type: expected an integer, got '{}'", raw))
            })?),
            None => None,
        };

        let offset = match non_empty(&params.offset).map(parse_saturating) {
            Some(Some(offset)) => offset.max(0) as u64,
            Some(None) => {
                log::debug!("Ignoring malformed offset {:?}", params.offset);
                0
            }
            None => 0,
        };

        let limit = match non_empty(&params.limit).map(parse_saturating) {
            Some(Some(limit)) => {
                let clamped = limit.clamp(1, self.max_page_size as i64) as u64;
                if clamped as i64 != limit {
                    log::debug!("Clamped page limit {} to {}", limit, clamped);
                }
                clamped
            }
            Some(None) => {
                log::debug!("Ignoring malformed limit {:?}", params.limit);
                self.default_page_size
            }
            None => self.default_page_size,
        };

        Ok(FilterSpec {
            topic: non_empty(&params.topic).map(str::to_string),
            difficulty: non_empty(&params.difficulty).map(str::to_string),
            source: non_empty(&params.source).map(str::to_string),
            q_type,
            offset,
            limit,
        })
    }
}

// `?topic=` means no constraint on topic.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Integer text that overflows `i64` saturates instead of counting as malformed.
fn parse_saturating(raw: &str) -> Option<i64> {
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }

    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}
