//! Thin binary entry point; all real work lives in `ttm_rs::driver`.

fn main() -> anyhow::Result<()> {
    let code = ttm_rs::driver::run()?;
    std::process::exit(code);
}
