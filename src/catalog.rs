use anyhow::Result;
use clap::Args;

use crate::config::ClientConfig;
use crate::labels::LabelFormatter;
use crate::pivot::types::{DimensionType, PivotCatalog};
use crate::pivot::PivotClient;

#[derive(Debug, Args, Clone)]
pub struct ValuesArgs {
    /// Dimension identifier (e.g. DEPARTAMENTO)
    pub dimension: String,

    /// Only values whose label matches this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Maximum number of values; 0 lets the API decide
    #[arg(short, long)]
    pub limit: Option<u32>,
}

pub async fn run_catalog(config: &ClientConfig, formatter: &LabelFormatter) -> Result<()> {
    let client = PivotClient::new(config)?;
    let catalog = client.catalog().await?;
    print!("{}", render_catalog(&catalog, formatter));
    Ok(())
}

pub async fn run_values(
    args: ValuesArgs,
    config: &ClientConfig,
    formatter: &LabelFormatter,
) -> Result<()> {
    let client = PivotClient::new(config)?;
    let response = client
        .dimension_values(&args.dimension, args.search.as_deref(), args.limit)
        .await?;

    println!(
        "{} ({} valores)",
        formatter.format(&args.dimension),
        response.valores.len()
    );
    for option in &response.valores {
        println!(
            "{:>12} | {}",
            option.valor.to_string(),
            formatter.format(&option.etiqueta)
        );
    }
    Ok(())
}

pub fn render_catalog(catalog: &PivotCatalog, formatter: &LabelFormatter) -> String {
    let mut out = format!("Catálogo actualizado en {}\n\nDimensiones:\n", catalog.actualizado_en);
    for dimension in &catalog.dimensiones {
        let kind = match dimension.tipo {
            DimensionType::String => "texto",
            DimensionType::Number => "número",
        };
        let filter = if dimension.admite_filtrado { ", filtrable" } else { "" };
        out.push_str(&format!(
            "  {:<24} {} ({kind}{filter})\n",
            dimension.id,
            formatter.format(&dimension.etiqueta)
        ));
    }

    out.push_str("\nMedidas:\n");
    for measure in &catalog.medidas {
        out.push_str(&format!(
            "  {:<24} {} [{}]\n",
            measure.id,
            formatter.format(&measure.etiqueta),
            measure.agregacion_por_defecto
        ));
    }
    out
}
