#[tokio::main]
async fn main() {
    if let Err(e) = symptom_gate_lib::run().await {
        tracing::error!("{e}");
        eprintln!("symptom-gate: {e}");
        std::process::exit(1);
    }
}
