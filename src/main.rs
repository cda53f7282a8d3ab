mod assemble;
mod dot;
mod layout;
mod preview;
mod publish;
mod resolver;
mod zabbix;

use clap::Parser;
use tracing::info;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    ReadInput { path: String, source: std::io::Error },

    #[error("invalid graph in {path}: {source}")]
    ParseGraph { path: String, source: dot::ParseError },

    #[error(transparent)]
    Api(#[from] zabbix::ApiError),

    #[error(transparent)]
    Assemble(#[from] assemble::AssembleError),
}

#[derive(Parser, Debug)]
#[command(name = "dotmap", about = "Publish a Graphviz DOT diagram as a Zabbix map")]
struct Cli {
    #[arg(short = 'u', long, env = "ZABBIX_USERNAME", default_value = "admin")]
    username: String,

    #[arg(short = 'p', long, env = "ZABBIX_PASSWORD", default_value = "zabbix")]
    password: String,

    #[arg(short = 's', long, default_value = "localhost", help = "Host serving the web API")]
    host: String,

    #[arg(short = 'd', long, default_value = "/zabbix/", help = "Base path of the web API")]
    path: String,

    #[arg(short = 'r', long, default_value = "http", value_parser = ["http", "https"])]
    protocol: String,

    #[arg(short = 'f', long, default_value = "data.dot", help = "Input DOT file")]
    mapfile: String,

    #[arg(short = 'n', long, help = "Name of the map to create or replace")]
    mapname: String,

    #[arg(short = 'g', long, default_value_t = false, help = "Print an ASCII preview of the layout")]
    graphview: bool,

    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbosity: u8,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    let source = std::fs::read_to_string(&cli.mapfile)
        .map_err(|source| CliError::ReadInput { path: cli.mapfile.clone(), source })?;
    let graph = dot::parse(&source)
        .map_err(|source| CliError::ParseGraph { path: cli.mapfile.clone(), source })?;
    info!(
        file = %cli.mapfile,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "loaded graph"
    );

    let raw = layout::compute_layout(&graph);
    let positions = layout::fit_to_canvas(&raw, layout::MAP_WIDTH, layout::MAP_HEIGHT);

    let endpoint = zabbix::endpoint_url(&cli.protocol, &cli.host, &cli.path);
    info!(endpoint = %endpoint, "connecting to Zabbix API");
    let mut client = zabbix::ZabbixClient::new(&endpoint)?;
    client.login(&cli.username, &cli.password).await?;

    let resolver = resolver::ZabbixResolver::load(&client).await?;
    info!(icons = resolver.icon_count(), "loaded icon catalog");

    let elements = assemble::assemble_elements(&graph, &positions, &resolver).await?;
    let links = assemble::assemble_links(&graph)?;
    info!(elements = elements.len(), links = links.len(), "assembled map entities");

    let outcome = publish::publish(&client, &cli.mapname, elements, links).await?;
    info!(map = %cli.mapname, ?outcome, "map published");

    if cli.graphview {
        let names: Vec<&str> = graph
            .nodes
            .iter()
            .map(|node| node.attrs.get("label").map_or(node.id.as_str(), String::as_str))
            .collect();
        print!(
            "{}",
            preview::render(&names, &positions, layout::MAP_WIDTH, layout::MAP_HEIGHT)
        );
    }

    Ok(())
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}
