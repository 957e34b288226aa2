//! CSV upload of placements and CSV export of standings.

use crate::models::{EventError, Placement, Standing};
use std::io::{Read, Write};

/// Read placements from CSV with header `player_id,player_name,final_rank,wins,losses`.
/// The `player_name` column may be omitted or left blank.
pub fn parse_placements_csv<R: Read>(reader: R) -> Result<Vec<Placement>, EventError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    rdr.deserialize::<Placement>()
        .enumerate()
        .map(|(i, row)| {
            // +2: header line and 1-based numbering
            row.map_err(|e| EventError::InvalidCsv(format!("line {}: {}", i + 2, e)))
        })
        .collect()
}

/// Write standings as CSV, one row per player in the given order.
pub fn write_standings_csv<W: Write>(standings: &[Standing], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "rank",
        "player_id",
        "player_name",
        "points",
        "wins",
        "losses",
        "draws",
        "matches_played",
        "game_win_percentage",
        "opponent_win_percentage",
    ])?;
    for s in standings {
        wtr.write_record([
            s.rank.to_string(),
            s.player_id.to_string(),
            s.player_name.clone(),
            s.points.to_string(),
            s.wins.to_string(),
            s.losses.to_string(),
            s.draws.to_string(),
            s.matches_played.to_string(),
            format!("{:.4}", s.game_win_percentage),
            format!("{:.4}", s.opponent_win_percentage),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn parses_rows_with_and_without_names() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let data = format!(
            "player_id,player_name,final_rank,wins,losses\n{},Alice,1,3,0\n{},,2,2,1\n",
            a, b
        );
        let rows = parse_placements_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Placement::new(a, 1, 3, 0).named("Alice"));
        assert_eq!(rows[1].player_id, b);
        assert_eq!(rows[1].player_name, "");
        assert_eq!(rows[1].final_rank, 2);
    }

    #[test]
    fn name_column_is_optional() {
        let a = Uuid::new_v4();
        let data = format!("player_id,final_rank,wins,losses\n{},4,1,2\n", a);
        let rows = parse_placements_csv(data.as_bytes()).unwrap();
        assert_eq!(rows, vec![Placement::new(a, 4, 1, 2)]);
    }

    #[test]
    fn bad_row_reports_line() {
        let data = "player_id,final_rank,wins,losses\nnot-a-uuid,1,0,0\n";
        match parse_placements_csv(data.as_bytes()) {
            Err(EventError::InvalidCsv(msg)) => assert!(msg.starts_with("line 2")),
            other => panic!("expected InvalidCsv, got {:?}", other),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let standing = Standing {
            player_id: Uuid::nil(),
            player_name: "Alice".into(),
            points: 25,
            wins: 3,
            losses: 1,
            draws: 0,
            matches_played: 4,
            opponent_win_percentage: 0.0,
            game_win_percentage: 0.75,
            rank: 1,
        };
        let mut out = Vec::new();
        write_standings_csv(&[standing], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("rank,player_id,player_name,points"));
        assert_eq!(
            lines.next().unwrap(),
            format!("1,{},Alice,25,3,1,0,4,0.7500,0.0000", Uuid::nil())
        );
    }
}
