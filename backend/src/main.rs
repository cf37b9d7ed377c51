//! Backend entry-point: reads settings, initialises logging and serves the
//! plan API.

use mockable::DefaultEnv;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use briki_api::server::{self, ServerSettings, StartupError, log_filter};

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    let env = DefaultEnv::new();
    let directive = log_filter(&env);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }

    let result = match ServerSettings::from_env(&env) {
        Ok(settings) => server::run(settings).await,
        Err(err) => Err(err.into()),
    };
    if let Err(err) = &result {
        error!(error = %err, "server startup failed");
    }
    result
}
