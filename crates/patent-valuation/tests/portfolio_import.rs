use std::io::Write;

use patent_valuation::portfolio::{PatentCsvImporter, PatentImportError};

#[test]
fn importer_reads_export_from_disk() {
    let path = std::env::temp_dir().join(format!(
        "patent-valuation-import-{}.csv",
        std::process::id()
    ));
    let mut file = std::fs::File::create(&path).expect("create temp csv");
    write!(
        file,
        "Number,Title,Jurisdiction,Assignee,Tech Tag,Forward Citations,Backward Citations,Independent Claims,Dependent Claims,Family Size\n\
         US-11223344-B2,Adaptive photonic router,US,Lumen Dynamics,Photonics,18,6,4,16,7\n\
         WO-2024-554433,Biodegradable sensor mesh,WO,Verdant Labs,Materials,3,12,2,9,2\n"
    )
    .expect("write temp csv");
    drop(file);

    let drafts = PatentCsvImporter::from_path(&path).expect("import succeeds");
    std::fs::remove_file(&path).expect("clean up temp csv");

    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].tech_tag, "Photonics");
    assert_eq!(drafts[1].indicators.citations_backward, 12);
    assert!(drafts.iter().all(|draft| draft.legal_events.is_empty()));
}

#[test]
fn missing_file_reports_io_error() {
    let error = PatentCsvImporter::from_path("/nonexistent/patents.csv").expect_err("no file");
    assert!(matches!(error, PatentImportError::Io(_)));
}

#[test]
fn export_without_number_column_is_rejected() {
    let csv = "Title,Family Size\nOrphan record,3\n";
    let error = PatentCsvImporter::from_reader(csv.as_bytes()).expect_err("number required");
    assert!(matches!(error, PatentImportError::Csv(_)));
}
