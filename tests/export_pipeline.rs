use tablero_pivot::export::{export_file_name, render_csv, render_report, ExportMeta};
use tablero_pivot::pivot::types::PivotQueryResult;
use tablero_pivot::pivot::PivotTable;
use tablero_pivot::LabelFormatter;

fn sample_result() -> PivotQueryResult {
    serde_json::from_str(
        r#"{
            "datos": [
                {"NIVEL_ESTABLECIMIENTO": "UNIDAD DE SALUD SG", "ENERO_Q_AT_MEDICO_GEN": 1520.5, "ENERO_Q_AT_ENFERMERA_AUX": 980},
                {"NIVEL_ESTABLECIMIENTO": "HOSPITAL \"BASICO\"", "ENERO_Q_AT_MEDICO_GEN": null, "ENERO_Q_AT_ENFERMERA_AUX": 14}
            ],
            "totalGeneral": {"ENERO_Q_AT_MEDICO_GEN": 1520.5, "ENERO_Q_AT_ENFERMERA_AUX": 994},
            "aniosConsultados": [2023, 2024],
            "metadata": {
                "dimensionesSeleccionadas": ["NIVEL_ESTABLECIMIENTO", "MES"],
                "dimensionesFilas": ["NIVEL_ESTABLECIMIENTO"],
                "dimensionesColumnas": ["MES"],
                "medidasSeleccionadas": ["Q_AT_MEDICO_GEN", "Q_AT_ENFERMERA_AUX"]
            }
        }"#,
    )
    .expect("valid result")
}

#[test]
fn csv_export_of_a_query_result() {
    let formatter = LabelFormatter::default();
    let table = PivotTable::from_result(&sample_result());

    let csv = render_csv(&table.headers, &table.body, &table.totals, &formatter);
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(
        lines,
        vec![
            "\"Nivel de Establecimiento de Salud\",\"Enero - Médicos Generales\",\"Enero - Enfermeras Auxiliares\"",
            "\"UNIDAD DE SALUD SG\",\"1,520.5\",\"980\"",
            "\"HOSPITAL \"\"BASICO\"\"\",\"-\",\"14\"",
            "\"Total\",\"1,520.5\",\"994\"",
        ]
    );
}

#[test]
fn csv_export_is_written_under_the_dated_name() {
    let formatter = LabelFormatter::default();
    let table = PivotTable::from_result(&sample_result());
    let dir = tempfile::tempdir().expect("tempdir");
    let date = chrono::NaiveDate::from_ymd_opt(2025, 2, 1).expect("valid date");

    let path = dir.path().join(export_file_name(date, "csv"));
    std::fs::write(
        &path,
        render_csv(&table.headers, &table.body, &table.totals, &formatter),
    )
    .expect("write csv");

    let written = std::fs::read_to_string(&path).expect("read csv");
    assert!(path.ends_with("tabla_dinamica_2025-02-01.csv"));
    assert_eq!(written.lines().count(), 4);
}

#[test]
fn report_contains_header_metadata_and_escaped_table() {
    let formatter = LabelFormatter::default();
    let result = sample_result();
    let table = PivotTable::from_result(&result);
    let meta = ExportMeta {
        generated_at: "2025-02-01T08:30:00Z".into(),
        total_records: result.datos.len(),
        years: result.anios_consultados.clone(),
    };

    let report = render_report(
        &table.headers,
        &table.body,
        &table.totals,
        Some(&meta),
        &formatter,
    );

    assert!(report.starts_with("<!DOCTYPE html>"));
    assert!(report.contains("<title>República de Honduras - Secretaría de Salud</title>"));
    assert!(report.contains("<h1>REPUBLICA DE HONDURAS</h1><h2>SECRETARIA DE SALUD</h2>"));
    assert!(report.contains(
        "Generado en: 2025-02-01T08:30:00Z | Total de registros: 2 | Años consultados: 2023, 2024"
    ));
    assert!(report.contains("<th>Enero - Médicos Generales</th>"));
    assert!(report.contains("<td>HOSPITAL \"BASICO\"</td>"));
    assert!(report.contains("<tfoot><tr class=\"total-row\"><td>Total</td>"));
    assert!(report.contains("class=\"table-wrapper\""));
    assert!(report.contains("window.print()"));
}
