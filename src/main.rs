use std::net::IpAddr;

use http::StatusCode;
use serde_json::json;
use structopt::StructOpt;
use switchboard::{logging, Request, Response, RouteBuilder, Router};
use tracing::info;

#[derive(Debug, StructOpt)]
#[structopt(name = "switchboard", about = "Demo server for the switchboard router")]
struct Opt {
    /// Address to listen on
    #[structopt(long, env = "HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on
    #[structopt(long, env = "PORT", default_value = "8080")]
    port: u16,
}

fn api() -> switchboard::Result<Router> {
    RouteBuilder::new()
        .get("/users/:id", |request: Request, response: Response| async move {
            response.json(&json!({
                "id": request.param("id"),
                "route": request.route_path(),
            }))
        })
        .post("/users", |mut request: Request, response: Response| async move {
            let body = request.body().await?.clone();
            match body.as_json() {
                Some(user) => response.status(StatusCode::CREATED).json(user),
                None => response
                    .status(StatusCode::BAD_REQUEST)
                    .send("expected a JSON body"),
            }
        })
        .build()
}

fn app() -> switchboard::Result<Router> {
    let mut router = RouteBuilder::new()
        .get("/health", |_: Request, response: Response| async move {
            response.send("OK")
        })
        .get("/hello/:name", |request: Request, response: Response| async move {
            let name = request.param("name").unwrap_or("world").to_string();
            response.send(format!("Hello, {name}!"))
        })
        .build()?;
    router.mount("/api", api()?);
    Ok(router)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::install();
    let opt = Opt::from_args();
    let server = switchboard::builder(app()?)
        .with_host(opt.host)
        .with_port(opt.port)
        .build()
        .await?;
    info!(addr = %server.local_addr()?, "Listening");
    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
