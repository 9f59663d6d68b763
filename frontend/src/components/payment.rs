use crate::web::router::Link;
use leptos::prelude::*;
use templateshare::route::AppRoute;

struct Plan {
    name: &'static str,
    price: &'static str,
    period: Option<&'static str>,
    summary: &'static str,
    action: &'static str,
    featured: bool,
}

const PLANS: [Plan; 3] = [
    Plan {
        name: "Single Template",
        price: "$9.99",
        period: None,
        summary: "Access to one template",
        action: "Pay Now",
        featured: false,
    },
    Plan {
        name: "Premium Access",
        price: "$29.99",
        period: None,
        summary: "Access to all templates",
        action: "Pay Now",
        featured: true,
    },
    Plan {
        name: "Monthly Subscription",
        price: "$19.99",
        period: Some("/month"),
        summary: "Unlimited access + new templates",
        action: "Subscribe",
        featured: false,
    },
];

/// 付费引导页（纯展示，不处理支付）
#[component]
pub fn PaymentPage() -> impl IntoView {
    let plans = PLANS
        .iter()
        .map(|plan| {
            let card_class = if plan.featured {
                "border border-primary rounded-lg p-4 bg-primary/5"
            } else {
                "border border-base-300 rounded-lg p-4"
            };
            view! {
                <div class=card_class>
                    <div class="flex justify-between items-start">
                        <div>
                            <h4 class="font-semibold">{plan.name}</h4>
                            <p class="text-2xl font-bold text-primary">
                                {plan.price}
                                {plan.period.map(|p| view! { <span class="text-sm text-base-content/70">{p}</span> })}
                            </p>
                            <p class="text-sm text-base-content/70">{plan.summary}</p>
                        </div>
                        {plan.featured.then(|| view! { <span class="badge badge-primary">"Popular"</span> })}
                    </div>
                    <button class="btn btn-primary btn-sm w-full mt-2">{plan.action}</button>
                </div>
            }
        })
        .collect_view();

    view! {
        <div class="flex items-center justify-center py-12 px-4">
            <div class="max-w-md w-full space-y-8">
                <div class="text-center">
                    <div class="mx-auto flex items-center justify-center h-12 w-12 rounded-full bg-error/10">
                        <svg class="h-6 w-6 text-error" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                            <path
                                stroke-linecap="round"
                                stroke-linejoin="round"
                                stroke-width="2"
                                d="M12 9v2m0 4h.01m-6.938 4h13.856c1.54 0 2.502-1.667 1.732-2.5L13.732 4c-.77-.833-1.964-.833-2.732 0L4.082 16.5c-.77.833.192 2.5 1.732 2.5z"
                            />
                        </svg>
                    </div>
                    <h2 class="mt-6 text-3xl font-extrabold">"Screenshot Detected!"</h2>
                    <p class="mt-2 text-sm text-base-content/70">
                        "To download or take screenshots of our premium templates, please make a payment."
                    </p>
                </div>

                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h3 class="card-title text-lg">"Pricing Plans"</h3>
                        <div class="space-y-4">{plans}</div>
                        <p class="mt-4 text-center text-sm text-base-content/60">
                            "Secure payment powered by Stripe"
                        </p>
                    </div>
                </div>

                <div class="text-center">
                    <Link to=AppRoute::Templates class="link link-primary font-medium">"← Back to Templates"</Link>
                </div>
            </div>
        </div>
    }
}
