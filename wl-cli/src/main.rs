use clap::Parser;
use wl_client::{WlClientHttp, WlClientTrait};

#[derive(Parser, Debug)]
#[clap(about = "Read posts from a Where's Lucian? server")]
struct Cli {
    #[clap(short, long, default_value = "http://127.0.0.1:3000")]
    server: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    ListPosts {
        #[clap(long)]
        page: Option<u32>,
    },
    GetPost {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let client = WlClientHttp::connect(&args.server)?;

    match args.command {
        Command::ListPosts { page } => {
            let page = client.list_posts(page).await?;
            println!("Page {} ({} posts)", page.page, page.posts.len());
            for post in &page.posts {
                println!(
                    "- [{}] {} ({}, {} postlets, {} citations)",
                    post.id,
                    post.title,
                    post.created_at.format("%Y-%m-%d"),
                    post.postlets.len(),
                    post.citations.len()
                );
            }
            if page.has_more {
                println!("More: --page {}", page.page + 1);
            }
        }
        Command::GetPost { id } => {
            let post = client.get_post(id).await?;
            print!("{}", post);
        }
    }

    Ok(())
}
