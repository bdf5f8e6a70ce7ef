use anyhow::Context;
use clap::Parser;
use labs_client::LabsClient;
use labs_prerender::write_site;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Pre-renders static SEO pages for the Labs site")]
struct Args {
    /// SPA shell the metadata is stamped into.
    #[clap(long, default_value = "public/index.html")]
    template: PathBuf,

    /// Output directory; route pages, sitemap.xml and robots.txt land here.
    #[clap(long, default_value = "public")]
    out: PathBuf,

    /// Canonical site origin, e.g. https://labs.example.com
    #[clap(long)]
    base_url: String,

    /// When set, published posts are fetched from the running API and
    /// written to <out>/data/posts.json as the static blog fallback.
    #[clap(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let base_url = args.base_url.trim_end_matches('/').to_string();

    let template = std::fs::read_to_string(&args.template)
        .with_context(|| format!("reading template {}", args.template.display()))?;

    let written = write_site(&template, &args.out, &base_url)?;
    println!("pre-rendered {} routes into {}", written, args.out.display());

    if let Some(api_url) = &args.api_url {
        let client = LabsClient::new(api_url)?;
        let posts: Vec<_> = client
            .list_posts()
            .await?
            .into_iter()
            .filter(|p| p.published)
            .collect();

        let data_dir = args.out.join("data");
        std::fs::create_dir_all(&data_dir)?;
        let target = data_dir.join("posts.json");
        std::fs::write(&target, serde_json::to_string_pretty(&posts)?)?;
        println!("wrote {} posts to {}", posts.len(), target.display());
    }

    Ok(())
}
