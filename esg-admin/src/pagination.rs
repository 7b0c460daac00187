//! Pagination for the assignment review listing

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Index of the first row on the page
    pub offset: i64,
}

/// Calculate pagination metadata from total results and requested page
///
/// Ensures page is within valid bounds [1, total_pages].
pub fn calculate_pagination(total_results: i64, requested_page: i64, page_size: i64) -> Pagination {
    // A page size below one would divide by zero
    let page_size = page_size.max(1);
    let total_pages = (total_results + page_size - 1) / page_size;
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * page_size;

    Pagination {
        page,
        total_pages,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = calculate_pagination(125, 2, 50);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset, 50);
    }

    #[test]
    fn test_pagination_out_of_bounds_high() {
        let p = calculate_pagination(75, 99, 50);
        assert_eq!(p.page, 2); // Clamped to last page
        assert_eq!(p.offset, 50);
    }

    #[test]
    fn test_pagination_out_of_bounds_low() {
        let p = calculate_pagination(75, 0, 50);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, 1, 50);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_non_positive_page_size_clamped() {
        let p = calculate_pagination(10, 1, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 10);
        assert_eq!(p.offset, 0);

        let p = calculate_pagination(10, 3, -2);
        assert_eq!(p.page, 3);
        assert_eq!(p.offset, 2);
    }

    #[test]
    fn test_pagination_exact_page_boundary() {
        let p = calculate_pagination(100, 2, 50);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 50);
    }
}
