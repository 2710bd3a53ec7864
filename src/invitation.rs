use crate::error::Result;
use crate::models::{Invitee, RecordedRsvp, RsvpStatus};
use crate::schema::{self, SheetLayout};
use crate::sheets::SheetStore;

fn holds_token(row: &[String], token: &str) -> bool {
    row.get(schema::TOKEN).is_some_and(|cell| cell == token)
}

/// Looks `token` up in the guest sheet. The first matching row wins.
pub async fn find_invitee(
    store: &dyn SheetStore,
    layout: &SheetLayout,
    token: &str,
) -> Result<Option<Invitee>> {
    let rows = store.get_values(&layout.invitees()).await?;

    Ok(rows
        .iter()
        .find(|row| holds_token(row, token))
        .map(|row| Invitee::from_row(row)))
}

/// Writes status, comment and submission time next to `token`'s row.
/// Returns `None` without writing anything when the token is unknown.
pub async fn record_rsvp(
    store: &dyn SheetStore,
    layout: &SheetLayout,
    token: &str,
    status: RsvpStatus,
    comment: &str,
    submitted_at: String,
) -> Result<Option<RecordedRsvp>> {
    let rows = store.get_values(&layout.tokens()).await?;

    let row = match rows.iter().position(|row| holds_token(row, token)) {
        Some(index) => index + 1,
        None => return Ok(None),
    };

    let values = vec![vec![
        status.label().to_string(),
        comment.to_string(),
        submitted_at.clone(),
    ]];
    store.update_values(&layout.response(row), values).await?;

    Ok(Some(RecordedRsvp {
        row,
        status,
        comment: comment.to_string(),
        submitted_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::MemorySheet;

    fn guests() -> MemorySheet {
        MemorySheet::from_cells(&[
            &["abc123", "Mr", "John", "Smith"],
            &[],
            &["def456", "Ms", "Anna"],
            &["abc123", "Dr", "Duplicate", "Row"],
        ])
    }

    #[rocket::async_test]
    async fn finds_first_matching_row() {
        let sheet = guests();
        let layout = SheetLayout::new("Arkusz1");

        let invitee = find_invitee(&sheet, &layout, "abc123").await.unwrap().unwrap();
        assert_eq!(invitee.name, "John");
        assert_eq!(invitee.surname, "Smith");

        let invitee = find_invitee(&sheet, &layout, "def456").await.unwrap().unwrap();
        assert_eq!(invitee.title, "Ms");
        assert_eq!(invitee.surname, "");
    }

    #[rocket::async_test]
    async fn unknown_token_is_none() {
        let sheet = guests();
        let layout = SheetLayout::new("Arkusz1");

        assert!(find_invitee(&sheet, &layout, "zzz").await.unwrap().is_none());
        assert!(find_invitee(&sheet, &layout, "").await.unwrap().is_none());
    }

    #[rocket::async_test]
    async fn records_against_sheet_row_number() {
        let sheet = guests();
        let layout = SheetLayout::new("Arkusz1");

        let recorded = record_rsvp(
            &sheet,
            &layout,
            "def456",
            RsvpStatus::Declined,
            "Sorry, \"abroad\" <b>then</b>",
            "19.10.2026, 14:30:00".to_string(),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(recorded.row, 3);
        assert_eq!(
            sheet.snapshot()[2],
            vec![
                "def456",
                "Ms",
                "Anna",
                "",
                "NIE BĘDĘ",
                "Sorry, \"abroad\" <b>then</b>",
                "19.10.2026, 14:30:00"
            ]
        );
        assert_eq!(sheet.snapshot()[3].len(), 4);
    }

    #[rocket::async_test]
    async fn unknown_token_writes_nothing() {
        let sheet = guests();
        let layout = SheetLayout::new("Arkusz1");
        let before = sheet.snapshot();

        let recorded = record_rsvp(
            &sheet,
            &layout,
            "nobody",
            RsvpStatus::Attending,
            "",
            "now".to_string(),
        )
        .await
        .unwrap();

        assert!(recorded.is_none());
        assert_eq!(sheet.snapshot(), before);
    }
}
