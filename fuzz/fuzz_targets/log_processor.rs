#![no_main]

use libfuzzer_sys::fuzz_target;
use std::cell::RefCell;

thread_local! {
    static RUNTIME: RefCell<Option<tokio::runtime::Runtime>> = RefCell::new(None);
}

fn with_runtime<F>(action: F)
where
    F: FnOnce(&tokio::runtime::Runtime),
{
    RUNTIME.with(|cell| {
        if cell.borrow().is_none() {
            if let Ok(runtime) = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                *cell.borrow_mut() = Some(runtime);
            }
        }

        if let Some(runtime) = cell.borrow().as_ref() {
            action(runtime);
        }
    });
}

fuzz_target!(|data: &[u8]| {
    if data.len() > 1_000_000 {
        return;
    }

    with_runtime(|runtime| {
        runtime.block_on(async {
            if let Ok(processor) = route_metrics::fuzzing::process_log_input(data).await {
                let mut previous_last = 0;
                for run in processor.runs() {
                    debug_assert!(run.is_finalized());
                    debug_assert!(run.first_line > previous_last);
                    let last = run.last_line.unwrap_or(run.first_line);
                    debug_assert!(last >= run.first_line);
                    previous_last = last;
                }
            }
        });
    });
});
