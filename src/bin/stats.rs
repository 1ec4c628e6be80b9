use kinmcp::db::{load_persons, Db};
use kinmcp::roster::FamilyStats;
use kinmcp::{Config, FamilyGraph};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;
    let db = Db::new(config.db_path());
    db.migrate().await?;

    let graph = FamilyGraph::new(load_persons(&db).await?);
    let stats = FamilyStats::from_graph(&graph);

    println!("\n=== kinmcp Family Statistics ===\n");

    if stats.total == 0 {
        println!("No members stored.");
        println!("\nRun `import <file.csv>` to load a family.");
        return Ok(());
    }

    println!("{:-<40}", "");
    println!("{:<28} {:>10}", "Members", stats.total);
    println!("{:<28} {:>10}", "Men", stats.men);
    println!("{:<28} {:>10}", "Women", stats.women);
    println!("{:<28} {:>10}", "Married", stats.married);
    println!("{:-<40}", "");

    let dangling = graph
        .persons()
        .iter()
        .flat_map(|p| p.father_id.iter().chain(p.mother_id.iter()).map(String::as_str).chain(p.spouses.iter()))
        .filter(|id| graph.person(id).is_none())
        .count();
    if dangling > 0 {
        println!("\n{} references point at members that are not stored.", dangling);
    }

    Ok(())
}
