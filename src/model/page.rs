use crate::model::InstrumentProperty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub property: InstrumentProperty,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(property: InstrumentProperty) -> Self {
        Self {
            property,
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: InstrumentProperty) -> Self {
        Self {
            property,
            direction: Direction::Desc,
        }
    }

    /// Parse a `property[,asc|desc]` query value, e.g. `id,desc`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut parts = raw.split(',').map(str::trim);
        let property = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| format!("Invalid sort parameter '{}'", raw))?
            .parse::<InstrumentProperty>()?;

        let direction = match parts.next().map(|d| d.to_ascii_lowercase()) {
            None => Direction::Asc,
            Some(d) if d.is_empty() || d == "asc" => Direction::Asc,
            Some(d) if d == "desc" => Direction::Desc,
            Some(d) => return Err(format!("Invalid sort direction '{}'", d)),
        };

        if parts.next().is_some() {
            return Err(format!("Invalid sort parameter '{}'", raw));
        }

        Ok(Self { property, direction })
    }
}

/// Zero-based page request with optional ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Sort orders to apply, falling back to ascending id.
    pub fn effective_sort(&self) -> Vec<SortOrder> {
        if self.sort.is_empty() {
            vec![SortOrder::asc(InstrumentProperty::Id)]
        } else {
            self.sort.clone()
        }
    }
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            1
        } else {
            self.total_elements.div_ceil(self.size)
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parsing() {
        assert_eq!(
            SortOrder::parse("id,desc").unwrap(),
            SortOrder::desc(InstrumentProperty::Id)
        );
        assert_eq!(
            SortOrder::parse("name").unwrap(),
            SortOrder::asc(InstrumentProperty::Name)
        );
        assert_eq!(
            SortOrder::parse("name,ASC").unwrap(),
            SortOrder::asc(InstrumentProperty::Name)
        );
        assert!(SortOrder::parse("").is_err());
        assert!(SortOrder::parse("id,sideways").is_err());
        assert!(SortOrder::parse("price,asc").is_err());
        assert!(SortOrder::parse("id,asc,extra").is_err());
    }

    #[test]
    fn test_page_metadata() {
        let request = PageRequest::new(1, 20);
        assert_eq!(request.offset(), 20);

        let page = Page::new(vec![1, 2, 3], &request, 45);
        assert_eq!(page.total_pages(), 3);

        let empty: Page<i32> = Page::new(Vec::new(), &PageRequest::new(0, 20), 0);
        assert_eq!(empty.total_pages(), 0);

        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.content, vec![10, 20, 30]);
        assert_eq!(mapped.total_elements, 45);
        assert_eq!(mapped.page, 1);
    }

    #[test]
    fn test_default_sort_is_id_ascending() {
        let request = PageRequest::new(0, 10);
        assert_eq!(
            request.effective_sort(),
            vec![SortOrder::asc(InstrumentProperty::Id)]
        );

        let request = request.with_sort(SortOrder::desc(InstrumentProperty::Name));
        assert_eq!(
            request.effective_sort(),
            vec![SortOrder::desc(InstrumentProperty::Name)]
        );
    }
}
