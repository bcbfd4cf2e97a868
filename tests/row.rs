mod common;

use chrono::NaiveDate;
use common::{hash, key, text};
use tabular::{
    ColumnRef, Record, Renderer, TabularError, Value, data::Cell, error::Result, row::RowRef,
    table::Table,
};

fn planets(rows: &[&[&str]]) -> Table {
    let mut table = Table::from_records([Record::positional(["planet", "star"])]).unwrap();
    for cells in rows {
        table.append(Record::positional(cells.iter().copied())).unwrap();
    }
    table
}

#[test]
fn keyed_row_reads_by_key() {
    let table = Table::from_records([Record::keyed([("place", "1")])]).unwrap();
    let row = table.first().unwrap();

    assert_eq!(row.get("city").unwrap(), None);
    assert_eq!(row.join(""), "1");
    assert_eq!(row.to_hash().unwrap(), hash(&[("place", "1")]));
    assert_eq!(row.to_string(), "1");
    assert_eq!(row.source(), &Record::keyed([("place", "1")]));
}

#[test]
fn set_replaces_and_adds_cells() {
    let mut table = planets(&[&["Mars", "Sun"]]);
    assert_eq!(table.first().unwrap().get("star").unwrap(), text("Sun"));

    let mut row = table.row_mut(0).unwrap();
    row.set("star", "Solaris").unwrap();
    assert_eq!(row.get("star").unwrap(), text("Solaris"));

    row.set("astronaut", "Buzz").unwrap();
    assert_eq!(row.get("astronaut").unwrap(), text("Buzz"));

    row.clear("planet").unwrap();
    assert_eq!(row.get("planet").unwrap(), None);

    assert!(table.columns().contains_key("astronaut"));
    assert_eq!(table.first().unwrap().to_string(), ", Solaris, Buzz");
}

#[test]
fn join_and_display() {
    let table = planets(&[&["Mars", "Sun"]]);
    let row = table.first().unwrap();
    assert_eq!(row.join(""), "MarsSun");
    assert_eq!(row.join("-"), "Mars-Sun");
    assert_eq!(row.to_string(), "Mars, Sun");
}

#[test]
fn to_hash_skips_blank_headers() {
    let table = Table::from_records([
        Record::positional(["planet", "star", ""]),
        Record::positional(["Mars", "Sun", ""]),
    ])
    .unwrap();

    let row = table.first().unwrap();
    assert_eq!(
        row.to_hash().unwrap(),
        hash(&[("planet", "Mars"), ("star", "Sun")])
    );
    assert_eq!(row.keys(), vec![key("planet"), key("star")]);
}

struct StarRenderer;

impl Renderer for StarRenderer {
    fn render(&self, column: &ColumnRef<'_>, row: &RowRef<'_>) -> Result<Cell> {
        let Some(key) = column.key() else {
            return Ok(None);
        };
        Ok(row.get(key.as_str())?.map(|value| {
            let starred: String = value
                .as_display()
                .chars()
                .map(|c| if c.is_alphanumeric() || c == '_' { '*' } else { c })
                .collect();
            Value::from(starred)
        }))
    }
}

#[test]
fn render_uses_column_renderer() {
    let mut table = planets(&[&["Mars", "Sun"]]);
    table.set_column_renderer("planet", StarRenderer);

    let row = table.first().unwrap();
    assert_eq!(row.render("planet").unwrap(), text("****"));
    assert_eq!(row.render("star").unwrap(), text("Sun"));
    assert_eq!(row.render("moon").unwrap(), None);
}

#[test]
fn table_renderer_applies_to_every_column() {
    let mut table = planets(&[&["Mars", "Sun"]]);
    table.set_renderer(StarRenderer);

    let row = table.first().unwrap();
    assert_eq!(row.render("planet").unwrap(), text("****"));
    assert_eq!(row.render("star").unwrap(), text("***"));
    assert_eq!(row.to_space_delimited().unwrap(), "****     *** ");
}

#[test]
fn render_without_renderer_is_the_value() {
    let table = planets(&[&["Mars", "Sun"]]);
    assert_eq!(table.first().unwrap().render("planet").unwrap(), text("Mars"));
}

#[test]
fn previous_and_next() {
    let table = planets(&[&["Mars", "Sun"], &["Jupiter", "Sun"]]);

    let first = table.first().unwrap();
    let last = table.last().unwrap();
    assert!(first.previous().is_none());
    assert_eq!(last.previous().unwrap().get("planet").unwrap(), text("Mars"));
    assert_eq!(first.next().unwrap().get("planet").unwrap(), text("Jupiter"));
    assert!(last.next().is_none());
}

#[test]
fn each_with_key_visits_header_order() {
    let table = planets(&[&["Mars", "Sun"]]);
    let mut results = Vec::new();
    table
        .first()
        .unwrap()
        .each_with_key(|key, value| results.push((key.to_string(), value.clone())))
        .unwrap();

    assert_eq!(
        results,
        vec![
            ("planet".to_string(), text("Mars")),
            ("star".to_string(), text("Sun")),
        ]
    );
}

#[test]
fn invalid_date_fails_on_read() {
    let table = Table::from_records([
        Record::positional(["date"]),
        Record::positional(["99/z/99"]),
    ])
    .expect("malformed dates are accepted on append");

    let row = table.first().unwrap();
    let err = row.get("date").unwrap_err();
    assert!(matches!(err, TabularError::DateCoercion { index: 0, .. }));
    assert_eq!(err.to_string(), "'date' row 0 '99/z/99' is not a valid date");
    assert_eq!(row.join(""), "99/z/99");
}

#[test]
fn compact_american_dates() {
    let table = Table::from_records([
        Record::positional(["date"]),
        Record::positional(["1/1/99"]),
        Record::positional(["8/28/00"]),
        Record::positional(["12/31/08"]),
        Record::positional(["2006-01-20"]),
        Record::positional(["Jan 20, 2006"]),
        Record::positional([""]),
    ])
    .unwrap();

    let dates = table
        .rows()
        .map(|row| row.get("date").unwrap())
        .collect::<Vec<_>>();
    let date = |y, m, d| Some(Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap()));
    assert_eq!(
        dates,
        vec![
            date(1999, 1, 1),
            date(2000, 8, 28),
            date(2008, 12, 31),
            date(2006, 1, 20),
            date(2006, 1, 20),
            None,
        ]
    );
}

#[test]
fn to_space_delimited_pads_cells() {
    let table = planets(&[&[]]);
    assert_eq!(table.first().unwrap().to_space_delimited().unwrap(), "             ");

    let table = planets(&[&["Mars", "Sun"]]);
    assert_eq!(
        table.first().unwrap().to_space_delimited().unwrap(),
        "Mars     Sun "
    );
}

#[test]
fn is_last() {
    let mut table = planets(&[&["Mars", "Sun"]]);
    assert!(table.get(0).unwrap().is_last());

    table.append(Record::positional(["Earth", "Sun"])).unwrap();
    assert!(!table.get(0).unwrap().is_last());
    assert!(table.get(1).unwrap().is_last());
}

#[test]
fn delete_blank_rows_renumbers_navigation() {
    let mut table = planets(&[&["", "   "], &["Mars", "Sun"], &["Jupiter", "Sun"]]);
    table
        .append(Record::Positional(vec![text(""), None]))
        .unwrap();
    assert!(table.get(0).unwrap().is_blank());

    table.delete_blank_rows();

    assert_eq!(table.len(), 2);
    let first = table.get(0).unwrap();
    let second = table.get(1).unwrap();
    assert_eq!(first.index(), 0);
    assert!(first.previous().is_none());
    assert_eq!(first.next().unwrap().to_string(), "Jupiter, Sun");
    assert_eq!(second.previous().unwrap().to_string(), "Mars, Sun");
    assert!(second.next().is_none());
}

#[test]
fn keyed_view_tracks_positional_cells_after_writes() {
    let mut table = Table::from_records([
        Record::positional(["planet", "date", "moons?"]),
        Record::positional(["Mars", "7/20/76", "1"]),
    ])
    .unwrap();
    let before = table.first().unwrap().to_hash().unwrap();
    assert_eq!(before[&key("moons?")], Some(Value::Boolean(true)));

    let mut row = table.row_mut(0).unwrap();
    row.set("date", "2021-02-18").unwrap();
    row.set("moons?", 0_i64).unwrap();
    row.set("rover", "Perseverance").unwrap();

    let view = table.first().unwrap();
    let keyed = view.to_hash().unwrap();
    for key in view.keys() {
        assert_eq!(keyed[&key], view.get(key.as_str()).unwrap(), "{key}");
    }
    assert_eq!(
        keyed[&key("date")],
        Some(Value::Date(NaiveDate::from_ymd_opt(2021, 2, 18).unwrap()))
    );
    assert_eq!(keyed[&key("moons?")], Some(Value::Boolean(false)));
    assert_eq!(view.join("|"), "Mars|2021-02-18|0|Perseverance");
}

#[test]
fn four_digit_year_slash_dates_read_day_first() {
    let table = Table::from_records([
        Record::positional(["date"]),
        Record::positional(["31/12/2008"]),
        Record::positional(["1/2/2003"]),
        Record::positional(["12/31/2008"]),
    ])
    .unwrap();

    let dates = table
        .rows()
        .map(|row| row.get("date").unwrap())
        .collect::<Vec<_>>();
    let date = |y, m, d| Some(Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap()));
    assert_eq!(
        dates,
        vec![date(2008, 12, 31), date(2003, 2, 1), date(2008, 12, 31)]
    );
}
