//! Declarative macros for ergonomic effect construction
//!
//! Slice reducers launch every remote operation through [`async_effect!`].

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use folio_core::async_effect;
///
/// async_effect! {
///     let outcome = thunk.run(&api, input, signal).await;
///     Some(ProjectsAction::FetchAll(outcome.into_lifecycle(input)))
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

    #[derive(Clone, Debug)]
    enum TestAction {
        AsyncResult { value: i32 },
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 42 })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! builds a future");
        };
        assert!(matches!(
            tokio_test::block_on(fut),
            Some(TestAction::AsyncResult { value: 42 })
        ));
    }
}
