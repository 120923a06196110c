use leptos::prelude::*;

/// Titled section with an anchor link
#[component]
pub fn Section(#[prop(into)] id: String, #[prop(into)] title: String, children: Children) -> impl IntoView {
    let anchor_href = format!("#{}", id);

    view! {
        <section id=id class="snippet">
            <h2 class="snippet-title">
                {title}
                <a href=anchor_href class="section-anchor">" \u{00A7}"</a>
            </h2>
            {children()}
        </section>
    }
}
