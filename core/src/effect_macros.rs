//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// The block evaluates to `Option<Action>`; `Some` is fed back into the reducer.
///
/// # Example
///
/// ```rust,ignore
/// use auction_desk_core::async_effect;
///
/// async_effect! {
///     let result = assigner.assign(&event_id, &guest_id, number).await;
///     Some(BidderNumberAction::Settled { guest_id, result })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
