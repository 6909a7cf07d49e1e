use siteperf::error::AppResult;

fn main() -> AppResult<()> {
    siteperf::entry::run()
}
