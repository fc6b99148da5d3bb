//! Rendered Frame Tests
//!
//! Decompose real birth/now pairs and check the text of the resulting frames:
//! labels, zero padding, band wrapping and the final snapshot.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use ageticker_tui::render::{HEADER, SNAPSHOT_HEADER};
use ageticker_tui::{GlyphRenderer, GlyphTable, Viewport};
use ticker_core::{decompose, BirthRecord, ElapsedDuration, Precision, Unit};

fn elapsed(birth: &BirthRecord, y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> ElapsedDuration {
    let now = NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap();
    decompose(birth.instant(), now).unwrap()
}

/// The five glyph rows of `text` as the renderer draws them
fn big(text: &str) -> [String; 5] {
    GlyphTable::standard().render_text(text)
}

#[test]
fn test_month_end_scenario_renders_one_month_one_day() {
    let birth = BirthRecord::new(31, 1, 2000, 12, 0, 0, 0).unwrap();
    let value = elapsed(&birth, 2000, 3, 1, 12, 0, 0);
    let renderer = GlyphRenderer::new(GlyphTable::standard(), Precision::Seconds);

    let placements = renderer.layout(&value, 200);
    let texts: Vec<(Unit, &str)> = placements.iter().map(|p| (p.unit, p.text.as_str())).collect();
    assert_eq!(
        texts,
        vec![
            (Unit::Years, "000"),
            (Unit::Months, "01"),
            (Unit::Days, "01"),
            (Unit::Hours, "00"),
            (Unit::Minutes, "00"),
            (Unit::Seconds, "00"),
        ]
    );
}

#[test]
fn test_digit_rows_sit_under_their_labels() {
    let birth = BirthRecord::new(15, 6, 1985, 8, 30, 0, 0).unwrap();
    let value = elapsed(&birth, 2024, 7, 27, 16, 45, 9);
    let renderer = GlyphRenderer::new(GlyphTable::standard(), Precision::Seconds);

    let frame = renderer.render(&value, Viewport::new(160, 12));
    let lines = frame.to_lines();

    assert_eq!(lines[0], format!("  {HEADER}"));
    for placement in renderer.layout(&value, 160) {
        let label_row = &lines[placement.y as usize];
        assert!(
            label_row.contains(placement.unit.label()),
            "missing label {}",
            placement.unit.label()
        );

        let rows = big(&placement.text);
        for (i, row) in rows.iter().enumerate() {
            let line = &lines[placement.y as usize + 1 + i];
            let start = placement.x as usize;
            let drawn: String = line.chars().skip(start).take(row.chars().count()).collect();
            assert_eq!(drawn.trim_end(), row.trim_end());
        }
    }
}

#[test]
fn test_millis_precision_adds_a_group() {
    let birth = BirthRecord::new(1, 1, 2000, 0, 0, 0, 0).unwrap();
    let now = NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_milli_opt(0, 0, 1, 42)
        .unwrap();
    let value = decompose(birth.instant(), now).unwrap();

    let seconds = GlyphRenderer::new(GlyphTable::standard(), Precision::Seconds);
    let millis = GlyphRenderer::new(GlyphTable::standard(), Precision::Millis);

    assert_eq!(seconds.layout(&value, 300).len(), 6);
    let groups = millis.layout(&value, 300);
    assert_eq!(groups.len(), 7);
    assert_eq!(groups[6].text, "042");
}

#[test]
fn test_snapshot_contains_every_band_at_narrow_width() {
    let birth = BirthRecord::new(15, 6, 1985, 8, 30, 0, 0).unwrap();
    let value = elapsed(&birth, 2024, 7, 27, 16, 45, 9);
    let renderer = GlyphRenderer::new(GlyphTable::standard(), Precision::Seconds);

    let lines = renderer.snapshot(&value, 40);

    assert_eq!(lines[0], format!("  {SNAPSHOT_HEADER}"));
    assert_eq!(lines.len() as u16, renderer.required_height(&value, 40));
    for unit in renderer.units() {
        assert!(
            lines.iter().any(|l| l.contains(unit.label())),
            "snapshot lost {}",
            unit.label()
        );
    }
}

#[test]
fn test_same_input_same_frame() {
    let birth = BirthRecord::new(29, 2, 2000, 6, 0, 0, 0).unwrap();
    let value = elapsed(&birth, 2023, 2, 28, 6, 0, 0);
    let renderer = GlyphRenderer::new(GlyphTable::standard(), Precision::Millis);

    let viewport = Viewport::new(72, 20);
    assert_eq!(renderer.render(&value, viewport), renderer.render(&value, viewport));
}
