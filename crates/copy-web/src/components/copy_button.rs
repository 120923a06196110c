use leptos::prelude::*;

use crate::config::SiteConfig;

/// Icon shown while a button is idle.
pub const COPY_ICON: &str = r#"<i class="bi bi-clipboard"></i>"#;

/// A copy button explicitly tied to the block with id `target`.
/// Behaviour is attached client-side by the copy controller.
#[component]
pub fn CopyButton(
    /// Id of the `<pre>` whose text is copied
    #[prop(into)]
    target: String,
    /// Accessible label
    #[prop(into, default = "Copy to clipboard".to_string())]
    label: String,
) -> impl IntoView {
    let copy = use_context::<SiteConfig>().unwrap_or_default().copy;

    view! {
        <button
            type="button"
            class=format!("{} btn btn-sm btn-outline-secondary", copy.button_class)
            data-copy-target=target
            title=label.clone()
            aria-label=label
            inner_html=COPY_ICON
        ></button>
    }
}
