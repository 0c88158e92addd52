//! Asynchronous chain over the `Deferred` context.
//!
//! The chain itself is identical in shape to a synchronous one; only the
//! effect context changes. Each effectful step returns a boxed local
//! future, and `run()` yields one future for the whole pipeline.

use futures::future::LocalBoxFuture;
use sealway::{Deferred, Sealed};

#[derive(Debug)]
enum FetchOutcome {
    Served(String),
    RateLimited,
    EmptyUpstream,
}

fn fetch_quota(client_id: u32) -> LocalBoxFuture<'static, Option<u32>> {
    Box::pin(async move {
        // Stand-in for a quota service call.
        (client_id % 2 == 1).then_some(3)
    })
}

fn fetch_payload(quota: u32) -> LocalBoxFuture<'static, String> {
    Box::pin(async move { format!("payload within quota {quota}") })
}

fn serve(client_id: u32) -> LocalBoxFuture<'static, FetchOutcome> {
    Sealed::<Deferred, u32, FetchOutcome>::value_or(
        move || fetch_quota(client_id),
        FetchOutcome::RateLimited,
    )
    .ensure(|quota| *quota > 0, FetchOutcome::RateLimited)
    .semi_effect_map(fetch_payload)
    .ensure(|body| !body.is_empty(), FetchOutcome::EmptyUpstream)
    .flat_tap(|body| {
        Box::pin(async move {
            println!("serving {} bytes", body.len());
        })
    })
    .complete(FetchOutcome::Served)
    .run()
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    for client_id in [1, 2] {
        let outcome = serve(client_id).await;
        println!("client {client_id} -> {outcome:?}");
    }
}
