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
    if data.len() < 2 || data.len() > 100_000 {
        return;
    }
    let (selector, input) = data.split_at(1);
    let chunk_size = usize::from(selector.first().copied().unwrap_or(1)).max(1);

    with_runtime(|runtime| {
        runtime.block_on(async {
            let whole = route_metrics::fuzzing::read_lines_chunked(input, input.len()).await;
            let chunked = route_metrics::fuzzing::read_lines_chunked(input, chunk_size).await;
            if let (Ok(whole), Ok(chunked)) = (whole, chunked) {
                debug_assert_eq!(whole, chunked);
            }
        });
    });
});
