use shoplens::{search_products, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let as_json = args.iter().any(|a| a == "--json");
    let query = args
        .iter()
        .filter(|a| *a != "--json")
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    let query = if query.is_empty() {
        "gaming laptop".to_string()
    } else {
        query
    };

    let state = AppState::default();
    let outcome = search_products(&state, &query, 10, None).await;

    if as_json {
        println!("{}", outcome.to_json()?);
        return Ok(());
    }

    println!("strategy: {}", outcome.strategy);
    println!("query: {}", outcome.enhanced_query.enhanced_query);
    for (i, p) in outcome.products.iter().enumerate() {
        println!("{:2}. {:>12}  {}", i + 1, p.price_display, p.name);
        println!("      {}", p.source_url);
    }
    Ok(())
}
