//! Integration tests for the summary and transfer-join modes over an
//! exported statistics table.

use footstats::analysis::run_summary;
use footstats::csv;
use footstats::transfers::run_transfer_join;

const RESULT_CSV: &str = "\u{feff}Player,Team,Nation,Position,Age,Performance_Gls,Playing_Time_Min,Shooting_Standard_SoTPct\n\
A. Smith,X FC,ENG,DF,27,5,2700,48.0%\n\
B. Jones,Y FC,FRA,FW,25,12,2400,55.5%\n\
C. Sub,X FC,GER,MF,21,1,950,N/a\n\
D. Glove,Z FC,BRA,GK,30,N/a,2800,N/a\n";

async fn write_result_csv(dir: &tempfile::TempDir) -> String {
    let path = dir.path().join("result.csv");
    tokio::fs::write(&path, RESULT_CSV).await.unwrap();
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn test_summary_over_exported_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_result_csv(&dir).await;
    let top = dir.path().join("top_3.txt").to_string_lossy().to_string();
    let summary = dir.path().join("results2.csv").to_string_lossy().to_string();

    run_summary(&input, &top, &summary).await.unwrap();

    let report = tokio::fs::read_to_string(&top).await.unwrap();
    // Percent columns clean to numbers and participate
    assert!(report.contains("--- Shooting_Standard_SoTPct ---"));
    assert!(report.contains("--- Performance_Gls ---"));
    assert!(report.contains("  - B. Jones: 12.00"));
    // Age and the identity columns are not ranked
    assert!(!report.contains("--- Age ---"));
    // Minutes identify players and are excluded from ranking
    assert!(!report.contains("--- Playing_Time_Min ---"));

    let text = tokio::fs::read_to_string(&summary).await.unwrap();
    let (header, rows) = csv::split_header(csv::parse(&text));
    assert_eq!(header[0], "Team");
    assert!(header.contains(&"Mean of Performance_Gls".to_string()));
    // 'all' row first, then teams alphabetically
    assert_eq!(rows[0][0], "all");
    assert_eq!(rows[1][0], "X FC");
    assert_eq!(rows[2][0], "Y FC");
    assert_eq!(rows[3][0], "Z FC");

    // Mean of goals over all players: (5 + 12 + 1) / 3 = 6
    let mean_col = header
        .iter()
        .position(|h| h == "Mean of Performance_Gls")
        .unwrap();
    assert_eq!(rows[0][mean_col], "6.000");
}

#[tokio::test]
async fn test_transfer_join_over_exported_table() {
    let dir = tempfile::tempdir().unwrap();
    let stats = write_result_csv(&dir).await;
    let transfers = dir.path().join("transfers.csv");
    tokio::fs::write(
        &transfers,
        "player_name,team,price\nA. Smith,X FC,€40M\nC. Sub,X FC,€8M\nE. Unknown,W FC,€12M\n",
    )
    .await
    .unwrap();
    let output = dir.path().join("filtered.csv");

    run_transfer_join(
        &transfers.to_string_lossy(),
        &stats,
        &output.to_string_lossy(),
        900.0,
    )
    .await
    .unwrap();

    let text = tokio::fs::read_to_string(&output).await.unwrap();
    let (header, rows) = csv::split_header(csv::parse(&text));
    assert_eq!(header, vec!["Player", "team", "price", "Total_Minutes_Played"]);
    // A. Smith (2700) and C. Sub (950) clear the floor; E. Unknown has no
    // statistics row at all
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "A. Smith");
    assert_eq!(rows[0][3], "2700");
    assert_eq!(rows[1][0], "C. Sub");
    assert_eq!(rows[1][3], "950");
}
