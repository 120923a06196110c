use leptos::prelude::*;

use super::CopyButton;

/// Preformatted snippet followed by its copy button.
#[component]
pub fn CodeBlock(#[prop(into)] id: String, #[prop(into)] code: String) -> impl IntoView {
    let target = id.clone();

    view! {
        <div class="code-block">
            <pre id=id>{code}</pre>
            <CopyButton target=target />
        </div>
    }
}
