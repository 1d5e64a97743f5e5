fn main() -> anyhow::Result<()> {
    trello_radar::cli::run()
}
