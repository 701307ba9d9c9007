fn main() -> anyhow::Result<()> {
    actionrouter::cli::run_cli()
}
