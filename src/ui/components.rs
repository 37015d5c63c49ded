/// Reusable UI components shared by the popup and the new-tab page
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub message: Option<String>,
}

#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    let class = if props.message.is_some() {
        "toast show"
    } else {
        "toast"
    };

    html! {
        <div {class}>
            if let Some(message) = &props.message {
                <span class="toast-message">{message}</span>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ToggleRowProps {
    pub label: String,
    pub checked: bool,
    pub onchange: Callback<bool>,
}

#[function_component(ToggleRow)]
pub fn toggle_row(props: &ToggleRowProps) -> Html {
    let onchange = {
        let callback = props.onchange.clone();
        let checked = props.checked;
        Callback::from(move |_| callback.emit(!checked))
    };

    html! {
        <label class="toggle-row">
            <span class="toggle-label">{&props.label}</span>
            <input type="checkbox" checked={props.checked} onchange={onchange} />
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub struct SwatchButtonProps {
    /// CSS background value: a hex color or a gradient string.
    pub background: String,
    pub title: String,
    #[prop_or(false)]
    pub selected: bool,
    pub onclick: Callback<MouseEvent>,
    #[prop_or_default]
    pub onremove: Option<Callback<MouseEvent>>,
}

#[function_component(SwatchButton)]
pub fn swatch_button(props: &SwatchButtonProps) -> Html {
    let class = if props.selected {
        "swatch selected"
    } else {
        "swatch"
    };

    html! {
        <div
            {class}
            style={format!("background: {};", props.background)}
            title={props.title.clone()}
            onclick={props.onclick.clone()}
        >
            if let Some(onremove) = &props.onremove {
                <button
                    class="swatch-remove"
                    onclick={
                        let onremove = onremove.clone();
                        Callback::from(move |e: MouseEvent| {
                            e.stop_propagation();
                            onremove.emit(e);
                        })
                    }
                >
                    {"×"}
                </button>
            }
        </div>
    }
}
