#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = gradekeeper::run().await {
        eprintln!("gradekeeper fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
