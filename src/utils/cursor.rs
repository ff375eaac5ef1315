use uuid::Uuid;

/// Parse an opaque pagination cursor into the id of the last item of the
/// previous page. A cursor that doesn't parse is treated as absent.
pub fn parse_cursor(cursor: Option<&str>) -> Option<Uuid> {
    cursor.and_then(|c| Uuid::parse_str(c).ok())
}

/// Build the cursor for the next page from a `limit + 1` sized fetch.
///
/// The extra row beyond `limit` only signals that another page exists; the
/// cursor points at the last row that is actually returned to the client.
/// Returns None when there is no further page.
pub fn next_cursor<T>(items: &[T], limit: usize, id_of: impl Fn(&T) -> Uuid) -> Option<String> {
    if items.len() <= limit {
        return None;
    }
    items
        .get(limit.checked_sub(1)?)
        .map(|item| id_of(item).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_cursor_is_treated_as_absent() {
        assert_eq!(parse_cursor(None), None);
        assert_eq!(parse_cursor(Some("not-a-uuid")), None);

        let id = Uuid::new_v4();
        assert_eq!(parse_cursor(Some(&id.to_string())), Some(id));
    }

    #[test]
    fn no_next_cursor_when_page_is_not_full() {
        let items: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        assert_eq!(next_cursor(&items, 10, |id| *id), None);
        assert_eq!(next_cursor(&items, 3, |id| *id), None);
    }

    #[test]
    fn next_cursor_points_at_last_returned_item() {
        let items: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        // limit 4 with 5 fetched rows: the 5th row only signals another page
        let cursor = next_cursor(&items, 4, |id| *id);
        assert_eq!(cursor, Some(items[3].to_string()));
    }
}
