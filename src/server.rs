use crate::config::Config;
use crate::{routes, state};
use std::sync::Arc;
use tokio::{net::TcpListener, signal, task::JoinSet};
use tokio_util::sync::CancellationToken;

pub async fn run_until_done(config: Config) -> anyhow::Result<()> {
    let mut join_set = JoinSet::new();
    let shutdown_signal = CancellationToken::new();
    // axum serve
    {
        let shutdown_signal = shutdown_signal.clone();
        let addr = format!("{}:{}", config.server.host, config.server.port);
        let state = state::AppState::build(Arc::new(config))?;
        join_set.spawn(async move {
            let bind = TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", bind.local_addr()?);
            let routes = routes::build().with_state(state);
            axum::serve(bind, routes.into_make_service())
                .with_graceful_shutdown(async move {
                    shutdown_signal.cancelled().await;
                })
                .await?;
            Ok::<_, anyhow::Error>(())
        });
    }
    // register ctrl+c signal
    {
        let shutdown_signal = shutdown_signal.clone();
        join_set.spawn(async move {
            let _ = signal::ctrl_c().await;
            shutdown_signal.cancel();
            Ok(())
        });
    }
    // register sigterm signal to terminate gracefully when received
    #[cfg(target_os = "linux")]
    {
        let shutdown_signal = shutdown_signal.clone();
        join_set.spawn(async move {
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
            sigterm.recv().await;
            tracing::debug!("Received SIGTERM signal, start terminating");
            shutdown_signal.cancel();
            Ok(())
        });
    }
    while let Some(r) = join_set.join_next().await {
        if shutdown_signal.is_cancelled() {
            join_set.shutdown().await;
            break;
        }
        match r {
            Ok(Ok(_)) => (),
            Ok(Err(e)) => return Err(e),
            Err(e) => anyhow::bail!("Internal error in spawn: {e}"),
        }
    }
    Ok(())
}
