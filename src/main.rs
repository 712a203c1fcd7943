use anyhow::Result;

fn main() -> Result<()> {
    budgetdb::logging::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    budgetdb::cli::run(args)
}
