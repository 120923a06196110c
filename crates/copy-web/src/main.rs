#[cfg(feature = "ssr")]
#[derive(clap::Parser)]
#[command(about = "Serve copyable snippets")]
struct Args {
    /// Site config (TOML). Built-in snippets are used when omitted.
    #[arg(long, env = "SITE_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use anyhow::Context;
    use axum::Router;
    use clap::Parser;
    use copy_web::config::SiteConfig;
    use leptos::prelude::*;
    use leptos_axum::{LeptosRoutes, generate_route_list};
    use leptos_meta::MetaTags;
    use tower_http::compression::CompressionLayer;
    use tower_http::services::ServeDir;

    let args = Args::parse();
    let site = match &args.config {
        Some(path) => SiteConfig::load(path).map_err(|e| {
            eprintln!("{:#}", e);
            e
        })?,
        None => SiteConfig::default(),
    };
    println!("Serving {} snippet(s)", site.snippets.len());

    let conf = get_configuration(None)
        .context("Failed to load Leptos configuration")
        .map_err(|e| {
            eprintln!("{:#}", e);
            e
        })?;
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let routes = generate_route_list(copy_web::app::App);

    let site_root = leptos_options.site_root.clone();
    let shell_options = leptos_options.clone();
    let app = Router::new()
        .leptos_routes(&leptos_options, routes, {
            move || {
                use copy_web::app::App;
                provide_context(site.clone());
                view! {
                    <!DOCTYPE html>
                    <html lang="en">
                        <head>
                            <meta charset="utf-8" />
                            <meta name="viewport" content="width=device-width, initial-scale=1" />
                            <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.3/font/bootstrap-icons.min.css" />
                            <link rel="stylesheet" href="/pkg/copy-web.css" />
                            <HydrationScripts options=shell_options.clone() />
                            <MetaTags />
                        </head>
                        <body>
                            <App />
                        </body>
                    </html>
                }
            }
        })
        .fallback_service(ServeDir::new(&*site_root))
        .layer(CompressionLayer::new())
        .with_state(leptos_options);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        eprintln!("Failed to bind to {}: {}", addr, e);
        e
    })?;

    println!("Listening on http://{}", addr);

    axum::serve(listener, app).await.map_err(|e| {
        eprintln!("Server error: {}", e);
        e
    })?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    // Client code is loaded as wasm through `copy_web::hydrate`.
}
