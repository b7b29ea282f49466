use std::sync::Arc;

use tablero_pivot::labels::{is_acronym, LabelFormatter, LabelMap};

#[test]
fn documented_examples() {
    let formatter = LabelFormatter::default();
    assert_eq!(formatter.format(""), "");
    assert_eq!(formatter.format_optional(None), "");
    assert_eq!(formatter.format("Q_AT_MEDICO_GEN"), "Médicos Generales");
    assert_eq!(formatter.format("ENERO_TOTAL"), "Enero - Total");
    assert_eq!(
        formatter.format("FEBRERO_Q_AT_ENFERMERA_PRO"),
        "Febrero - Enfermeras Profesionales"
    );
    assert_eq!(formatter.format("Suma de REGION"), "Región");
}

#[test]
fn every_builtin_label_is_a_fixed_point() {
    let formatter = LabelFormatter::default();
    let codes = [
        "Q_AT_ENFERMERA_AUX",
        "Q_AT_ENFERMERA_PRO",
        "Q_AT_MEDICO_GEN",
        "Q_AT_MEDICO_ESP",
        "REGION",
        "MUNICIPIO",
        "ESTABLECIMIENTO",
        "NIVEL_ESTABLECIMIENTO",
        "GRUPO_ESPECIAL",
        "FORMULARIO",
    ];

    for code in codes {
        let label = formatter.format(code);
        assert_ne!(label, code, "{code} should be mapped");
        assert_eq!(formatter.format(&label), label, "{label} should be stable");
    }
}

#[test]
fn compound_labels_are_stable() {
    let formatter = LabelFormatter::default();
    for raw in ["ENERO_TOTAL", "DICIEMBRE_Q_AT_MEDICO_ESP", "JULIO_MES", "ABRIL_SUMA"] {
        let label = formatter.format(raw);
        assert!(label.contains(" - "), "{raw} should be compound, got {label}");
        assert_eq!(formatter.format(&label), label);
    }
}

#[test]
fn acronym_only_inputs_render_uppercase() {
    let formatter = LabelFormatter::default();
    for raw in [
        "VIH VIF",
        "SG UCS DIU",
        "DIU_VIH",
        "Q_AT_VIH_SG",
        "VIH_TOTAL",
        "vih vif",
        "sg",
        "Vih",
        "Ucs Diu",
        "vif_TOTAL",
    ] {
        let label = formatter.format(raw);
        for word in label.split(|c: char| c.is_whitespace() || c == '-') {
            if is_acronym(word) {
                assert_eq!(word, word.to_uppercase(), "{raw} rendered as {label}");
            }
        }
    }
}

#[test]
fn lowercase_acronym_labels_render_uppercase() {
    let formatter = LabelFormatter::default();
    assert_eq!(formatter.format("vih vif"), "VIH VIF");
    assert_eq!(formatter.format("sg"), "SG");
    assert_eq!(formatter.format("Sg Ucs Diu"), "SG UCS DIU");
    assert_eq!(formatter.format("casos vih"), "casos vih");
    assert_eq!(formatter.format("VIH VIF"), "VIH VIF");
}

#[test]
fn underscore_path_never_leaks_underscores() {
    let formatter = LabelFormatter::default();
    for raw in [
        "tipo_de_consulta",
        "GRUPO_DE_EDAD_10A14",
        "a_b_c_d",
        "__doble__guion__",
        "Sexo_Paciente",
    ] {
        let label = formatter.format(raw);
        assert!(!label.contains('_'), "{raw} rendered as {label}");
    }
}

#[test]
fn control_characters_and_spacing_are_normalized() {
    let formatter = LabelFormatter::default();
    assert_eq!(formatter.format("\tNIVEL\r\nOPERATIVO  "), "Nivel Operativo");
    assert_eq!(formatter.format("Ya   limpio"), "Ya limpio");
}

#[test]
fn formatter_uses_the_injected_table() {
    let labels = LabelMap::builtin().with_overrides(LabelMap::from_pairs([
        ("REGION", "Región Sanitaria"),
        ("Q_AT_PARTERA", "Parteras"),
    ]));
    let formatter = LabelFormatter::new(Arc::new(labels));

    assert_eq!(formatter.format("REGION"), "Región Sanitaria");
    assert_eq!(formatter.format("MAYO_Q_AT_PARTERA"), "Mayo - Parteras");
    assert_eq!(formatter.labels().get("MES"), Some("Mes"));

    let bare = LabelFormatter::new(Arc::new(LabelMap::empty()));
    assert_eq!(bare.format("REGION"), "Region");
}

#[test]
fn formatter_is_shareable_across_threads() {
    let formatter = LabelFormatter::default();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let formatter = formatter.clone();
            std::thread::spawn(move || formatter.format("ENERO_TOTAL"))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("thread"), "Enero - Total");
    }
}
