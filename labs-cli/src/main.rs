use clap::Parser;
use labs_client::{LabsClient, PostDraft, PostUpdate};
use std::path::PathBuf;

const TOKEN_FILE: &str = ".labs_token";

#[derive(Parser, Debug)]
#[command(about = "Authoring CLI for the Labs blog API")]
struct Cli {
    #[clap(short, long)]
    server: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Authenticate and cache the admin token locally.
    Login {
        #[clap(long)]
        password: String,
    },
    List,
    Get {
        id: i64,
    },
    Create {
        #[clap(long)]
        title: String,
        #[clap(long)]
        content: String,
        #[clap(long)]
        image_url: String,
        #[clap(long)]
        video_url: Option<String>,
        #[clap(long)]
        github_url: Option<String>,
        /// Create the post unpublished.
        #[clap(long)]
        draft: bool,
    },
    Update {
        id: i64,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        content: Option<String>,
        #[clap(long)]
        image_url: Option<String>,
        #[clap(long)]
        video_url: Option<String>,
        #[clap(long)]
        github_url: Option<String>,
        #[clap(long)]
        published: Option<bool>,
    },
    Delete {
        id: i64,
    },
    /// Upload an image and print the URL a post can reference.
    Upload {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let endpoint = args.server.as_deref().unwrap_or("http://127.0.0.1:8080");
    let mut client = LabsClient::new(endpoint)?;
    if let Ok(token) = std::fs::read_to_string(TOKEN_FILE) {
        let token = token.trim().to_string();
        if !token.is_empty() {
            client.set_token(token);
        }
    }

    match args.command {
        Command::Login { password } => {
            let token = client.login(&password).await?;
            std::fs::write(TOKEN_FILE, token)?;
            println!("Logged in; token cached in {TOKEN_FILE}");
        }
        Command::List => {
            let posts = client.list_posts().await?;
            println!("Posts ({})", posts.len());
            for post in posts {
                let marker = if post.published { "" } else { " [draft]" };
                println!("- [{}] {}{}", post.id, post.title, marker);
            }
        }
        Command::Get { id } => {
            let post = client.get_post(id).await?;
            println!("# {} (id {})", post.title, post.id);
            println!("image: {}", post.image_url);
            if let Some(video) = &post.video_url {
                println!("video: {video}");
            }
            if let Some(github) = &post.github_url {
                println!("github: {github}");
            }
            println!("\n{}", post.content);
        }
        Command::Create {
            title,
            content,
            image_url,
            video_url,
            github_url,
            draft,
        } => {
            let post = client
                .create_post(&PostDraft {
                    title,
                    content,
                    image_url,
                    video_url,
                    github_url,
                    published: if draft { Some(false) } else { None },
                })
                .await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::Update {
            id,
            title,
            content,
            image_url,
            video_url,
            github_url,
            published,
        } => {
            let post = client
                .update_post(
                    id,
                    &PostUpdate {
                        title,
                        content,
                        image_url,
                        video_url,
                        github_url,
                        published,
                    },
                )
                .await?;
            println!("Post updated: [{}] {}", post.id, post.title);
        }
        Command::Delete { id } => {
            client.delete_post(id).await?;
            println!("Post deleted!");
        }
        Command::Upload { file } => {
            let uploaded = client.upload_image(&file).await?;
            println!("Uploaded {} -> {}", uploaded.filename, uploaded.image_url);
        }
    }

    Ok(())
}
