//! Declarative macros for building effects
//!
//! These keep reducers readable when an effect wraps a short async block.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use movie_tracker_core::async_effect;
///
/// async_effect! {
///     match gateway.fetch_upcoming_movies().await {
///         Ok(raw) => Some(AppAction::LoadMovies(wrangle(&raw))),
///         Err(error) => Some(AppAction::RequestFailed { .. }),
///     }
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

#[cfg(test)]
mod tests {
    use crate::effect::Effect;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        AsyncResult { value: i32 },
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[tokio::test]
    async fn test_async_effect_macro_captures_by_move() {
        let value = 7;
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! always builds a future effect");
        };
        assert_eq!(fut.await, Some(TestAction::AsyncResult { value: 7 }));
    }
}
