use std::io;
use std::io::ErrorKind;

use ntex::web;
use ntex_files::Files;
use spdlog::info;

use crate::config::Config;
use crate::site::Site;

/// Serves the generated output tree for local preview. No rendering
/// happens here; the build owns that.
pub async fn server_run(site: Site, config: Config) -> io::Result<()> {
    let site_dir = site.output_path();
    if !site_dir.is_dir() {
        return Err(io::Error::new(
            ErrorKind::NotFound,
            format!("No generated output at {}. Run generate first", site_dir.display()),
        ));
    }

    let server = config.server.unwrap_or_default();
    let bind_addr = server.address.clone();
    let bind_port = server.port;

    info!("Serving {} on http://{}:{}", site_dir.display(), bind_addr, bind_port);

    web::HttpServer::new(move || {
        web::App::new().service(Files::new("/", site_dir.clone()).index_file("index.html"))
    })
    .bind((bind_addr, bind_port))?
    .run()
    .await
}
