use leptos::prelude::*;

use crate::catalog::Color;
use crate::catalog::filter::{CardType, CmcBucket, FilterConfiguration, PriceBucket, RELATED_COUNT_CHOICES};

/// Filter form. Every edit emits a whole new [`FilterConfiguration`].
#[component]
pub fn Filters(
	#[prop(into)] current: Signal<FilterConfiguration>,
	#[prop(into)] on_change: Callback<FilterConfiguration>,
) -> impl IntoView {
	let update = move |apply: Box<dyn FnOnce(&mut FilterConfiguration)>| {
		let mut next = current.get_untracked();
		apply(&mut next);
		if next != current.get_untracked() {
			on_change.run(next);
		}
	};

	view! {
		<div class="filters">
			<span class="filters-label">"Filters:"</span>

			<select
				prop:value=move || current.with(|f| f.card_type.map(CardType::value).unwrap_or_default().to_string())
				on:change=move |ev| {
					let value = event_target_value(&ev);
					update(Box::new(move |f| f.card_type = CardType::from_value(&value)));
				}
			>
				<option value="">"Card Type"</option>
				{CardType::ALL
					.into_iter()
					.map(|t| view! { <option value=t.value()>{t.label()}</option> })
					.collect_view()}
			</select>

			<select
				prop:value=move || current.with(|f| f.cmc.map(CmcBucket::value).unwrap_or_default())
				on:change=move |ev| {
					let value = event_target_value(&ev);
					update(Box::new(move |f| f.cmc = CmcBucket::from_value(&value)));
				}
			>
				<option value="">"Mana Value"</option>
				{CmcBucket::all()
					.map(|b| {
						let (value, label) = (b.value(), b.value());
						view! { <option value=value>{label}</option> }
					})
					.collect_view()}
			</select>

			<select
				prop:value=move || current.with(|f| f.color.map(Color::symbol).unwrap_or_default().to_string())
				on:change=move |ev| {
					let value = event_target_value(&ev);
					update(Box::new(move |f| f.color = Color::from_symbol(&value)));
				}
			>
				<option value="">"Color Identity"</option>
				{Color::ALL
					.into_iter()
					.map(|c| view! { <option value=c.symbol()>{c.label()}</option> })
					.collect_view()}
			</select>

			<select
				prop:value=move || current.with(|f| f.price.map(PriceBucket::value).unwrap_or_default().to_string())
				on:change=move |ev| {
					let value = event_target_value(&ev);
					update(Box::new(move |f| f.price = PriceBucket::from_value(&value)));
				}
			>
				<option value="">"Price Range"</option>
				{PriceBucket::ALL
					.into_iter()
					.map(|p| view! { <option value=p.value()>{p.label()}</option> })
					.collect_view()}
			</select>

			<select
				prop:value=move || current.with(|f| f.related_count.to_string())
				on:change=move |ev| {
					if let Ok(count) = event_target_value(&ev).parse::<usize>() {
						update(Box::new(move |f| f.related_count = count.max(1)));
					}
				}
			>
				{RELATED_COUNT_CHOICES
					.into_iter()
					.map(|n| view! { <option value=n.to_string()>{format!("{n} Cards")}</option> })
					.collect_view()}
			</select>

			<label class="filters-lands">
				<input
					type="checkbox"
					prop:checked=move || current.with(|f| f.include_lands)
					on:change=move |ev| {
						let checked = event_target_checked(&ev);
						update(Box::new(move |f| f.include_lands = checked));
					}
				/>
				<span>"Include Lands"</span>
			</label>
		</div>
	}
}
