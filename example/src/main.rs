use tracing::trace_span;
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use postro_types::Result;

mod decode;
mod encode;
mod error;

fn main() -> Result<()> {
    tracing_subscriber::Registry::default()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    trace_span!("decode").in_scope(decode::main)?;
    trace_span!("encode").in_scope(encode::main)?;
    trace_span!("error").in_scope(error::main)?;

    Ok(())
}
