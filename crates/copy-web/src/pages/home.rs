use leptos::prelude::*;
use leptos_meta::{Meta, Title};

use crate::components::{CodeBlock, Section};
use crate::config::{ROOT_ELEMENT_ID, SiteConfig};

#[component]
pub fn HomePage() -> impl IntoView {
    let site = use_context::<SiteConfig>().unwrap_or_default();
    let copy_config = site.copy.to_attribute();
    let empty = site.snippets.is_empty();

    let snippets = site
        .snippets
        .into_iter()
        .map(|snippet| {
            let section_id = format!("{}-section", snippet.id);
            view! {
                <Section id=section_id title=snippet.title>
                    <CodeBlock id=snippet.id code=snippet.body />
                </Section>
            }
        })
        .collect_view();

    view! {
        <Title text=site.title.clone() />
        <Meta name="description" content="Copyable command snippets" />
        <main id=ROOT_ELEMENT_ID data-copy-config=copy_config class="container py-4">
            <header class="mb-4">
                <h1>{site.title}</h1>
            </header>
            {empty.then(|| view! { <p class="text-muted">"No snippets configured."</p> })}
            {snippets}
        </main>
    }
}
