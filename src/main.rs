use anyhow::Context;
use taller_flow::models::delivery::StageFilter;
use taller_flow::{Config, Controller};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    let controller = Controller::new(config).context("failed to open storage")?;

    let cards = controller.overview(StageFilter::All)?;
    println!("Pedidos (fichas) — {}", cards.len());

    for (record, progress) in &cards {
        let title = if record.concept.is_empty() {
            record.ref_id.clone()
        } else {
            format!("{} — {}", record.ref_id, record.concept)
        };
        let progress_text = if progress.total > 0.0 {
            format!(
                "{}/{} ({}%)",
                progress.delivered,
                progress.total,
                progress.pct_clamped()
            )
        } else {
            format!("{}", progress.delivered)
        };

        println!();
        println!("  {}", title);
        println!(
            "    Empresa: {}   Pedido: {}   Prev: {}",
            record.company, record.date_ped, record.date_prev
        );
        println!(
            "    Etapa: {}   Entregado: {}   Pendiente: {}",
            progress.stage, progress_text, progress.pending
        );
    }

    if controller.config().render_debug_list {
        println!();
        for (record, _) in &cards {
            println!("{}", serde_json::to_string(&record.to_json())?);
        }
    }

    Ok(())
}
