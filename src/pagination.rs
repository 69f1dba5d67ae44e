//! This module defines the common functionality for paging data.

use crate::Error;

/// Split `records` into consecutive chunks of `page_size` and return the
/// chunk for `page`.
///
/// Pages are 1-indexed: `page` 1 returns the first `page_size` records. The
/// last page may be shorter than `page_size`. Record order is preserved.
///
/// # Errors
/// Returns an [Error::Validation] if `page_size` is zero, and an
/// [Error::PageOutOfRange] if `page` is zero or exceeds the number of pages
/// the record set splits into. An empty record set has zero pages, so every
/// page request against it is out of range.
pub fn paginate<T>(page: u64, page_size: u64, records: Vec<T>) -> Result<Vec<T>, Error> {
    if page_size < 1 {
        return Err(Error::Validation("page_size must be at least 1".to_owned()));
    }

    let page_count = records.len().div_ceil(page_size as usize) as u64;

    if page < 1 || page > page_count {
        return Err(Error::PageOutOfRange { page, page_count });
    }

    let start = (page - 1) as usize * page_size as usize;

    Ok(records
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect())
}

#[cfg(test)]
mod paginate_tests {
    use crate::{Error, pagination::paginate};

    #[test]
    fn returns_first_page() {
        let records = vec![1, 2, 3, 4, 5];

        let got = paginate(1, 2, records).unwrap();

        assert_eq!(got, [1, 2]);
    }

    #[test]
    fn last_page_may_be_shorter() {
        let records = vec![1, 2, 3, 4, 5];

        let got = paginate(3, 2, records).unwrap();

        assert_eq!(got, [5]);
    }

    #[test]
    fn pages_partition_the_record_set_in_order() {
        let record_count = 10;
        let page_size = 3;
        let records: Vec<u64> = (0..record_count).collect();

        let mut seen = Vec::new();
        for page in 1..=record_count.div_ceil(page_size) {
            seen.extend(paginate(page, page_size, records.clone()).unwrap());
        }

        assert_eq!(seen, records, "every record must appear exactly once, in order");
    }

    #[test]
    fn page_zero_is_out_of_range() {
        let got = paginate(0, 2, vec![1, 2, 3]);

        assert_eq!(
            got,
            Err(Error::PageOutOfRange {
                page: 0,
                page_count: 2
            })
        );
    }

    #[test]
    fn page_past_the_end_is_out_of_range() {
        let got = paginate(3, 2, vec![1, 2, 3]);

        assert_eq!(
            got,
            Err(Error::PageOutOfRange {
                page: 3,
                page_count: 2
            })
        );
    }

    #[test]
    fn empty_record_set_has_no_pages() {
        let got = paginate(1, 2, Vec::<i64>::new());

        assert_eq!(
            got,
            Err(Error::PageOutOfRange {
                page: 1,
                page_count: 0
            })
        );
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let got = paginate(1, 0, vec![1, 2, 3]);

        assert!(matches!(got, Err(Error::Validation(_))));
    }
}
