use leptos::ev::SubmitEvent;
use leptos::prelude::*;

/// Free-text card search. Input and submission are disabled while a
/// request is in flight.
#[component]
pub fn SearchBar(
	#[prop(into)] on_search: Callback<String>,
	#[prop(into)] loading: Signal<bool>,
) -> impl IntoView {
	let query = RwSignal::new(String::new());

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		if loading.get_untracked() {
			return;
		}
		let trimmed = query.get_untracked().trim().to_string();
		if !trimmed.is_empty() {
			on_search.run(trimmed);
		}
	};

	view! {
		<form class="search-bar" on:submit=on_submit>
			<input
				type="text"
				class="search-input"
				placeholder="Search for a Commander..."
				prop:value=move || query.get()
				on:input=move |ev| query.set(event_target_value(&ev))
				disabled=move || loading.get()
			/>
		</form>
	}
}
