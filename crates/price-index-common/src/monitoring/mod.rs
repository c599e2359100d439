//! Monitoring helpers. Metrics are emitted as `tracing` events whose field
//! prefix (`monotonic_counter.`, `counter.`, `histogram.`) is understood by
//! metric layers plugged on the subscriber, so libraries stay exporter agnostic.

#[macro_export]
macro_rules! measure_duration {
    ($e: expr) => {{
        let now = std::time::Instant::now();

        let result = $e;
        (result, now.elapsed())
    }};
}

#[macro_export]
macro_rules! metric {
    (counter [ $label: ident ] = $i: expr $(,$field: ident = $value: expr)*) => {
        $crate::tracing::debug!(monotonic_counter.$label = $i, $($field = $value),*)
    };
    (on error $e: expr => counter [ $label: ident ] = $i: expr $(,$field: ident = $value: expr)*) => {
        if let Err(ref e) = $e {
            $crate::tracing::debug!(counter.$label = $i, $($field = $value,)* error = e.to_string());
        }
    };
    (histogram [ $label: ident ] = $i: expr $(,$field: ident = $value: expr)*) => {
        $crate::tracing::debug!(histogram.$label = $i as f64, $($field = $value),*)
    };
}

/// Logs the error of a `Result` at error level and gives the result back untouched.
#[macro_export]
macro_rules! log_if_error {
    ($e: expr) => {
        match $e {
            Ok(v) => Ok(v),
            Err(e) => {
                $crate::tracing::error!("{}", e);
                Err(e)
            },
        }
    };
}
