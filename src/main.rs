#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // Desktop dev picks up BANTER_PROXY_URL from .env; browser builds bake it in.
    let _ = dotenvy::dotenv();
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {}

fn main() {
    load_dotenv();
    dioxus::launch(banter::ui::App);
}
