//! Telegram surface for the conversational assessment.
//!
//! The intake runs as a plain chat: `/assess` starts a session, every
//! following message answers the current question, and the final reply
//! carries the computed targets and meal plan.

use std::collections::HashMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use teloxide::{
    dispatching::UpdateFilterExt,
    dptree,
    prelude::*,
    utils::command::BotCommands,
};
use tokio::sync::Mutex;

use crate::assessment::{AssessmentSession, NutritionReport, build_report};
use crate::plan::build_meal_plan;
use crate::server::AppState;

/// Active assessment sessions, one per chat.
type Sessions = Arc<Mutex<HashMap<ChatId, AssessmentSession>>>;

pub async fn start_bot(state: Arc<AppState>) {
    let bot = Bot::from_env();
    let sessions: Sessions = Arc::new(Mutex::new(HashMap::new()));

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .branch(dptree::entry().filter_command::<Command>().endpoint(answer))
            .branch(dptree::filter(|_: Message| true).endpoint(handle_free_text)),
    )
    .dependencies(dptree::deps![state, sessions])
    .build()
    .dispatch()
    .await;
}

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
enum Command {
    #[command(description = "display this text.")]
    Help,
    #[command(description = "start the nutrition assessment.")]
    Assess,
    #[command(description = "cancel the current assessment.")]
    Cancel,
    #[command(description = "[calories] build a meal plan for a calorie target.")]
    Plan(i32),
}

async fn answer(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<AppState>,
    sessions: Sessions,
) -> ResponseResult<()> {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?
        }
        Command::Assess => {
            let session = AssessmentSession::new();
            let prompt = session
                .current_question()
                .map(|q| q.prompt())
                .unwrap_or_default();
            sessions.lock().await.insert(msg.chat.id, session);

            bot.send_message(
                msg.chat.id,
                format!("Let's work out your nutrition targets.\n\n{prompt}"),
            )
            .await?
        }
        Command::Cancel => {
            let removed = sessions.lock().await.remove(&msg.chat.id).is_some();
            let text = if removed {
                "Assessment cancelled."
            } else {
                "No assessment in progress. Send /assess to start one."
            };
            bot.send_message(msg.chat.id, text).await?
        }
        Command::Plan(calories) => {
            let data = state.data.read().await;
            let mut rng = StdRng::from_entropy();
            let plan = build_meal_plan(calories, None, &data.foods, &mut rng);
            drop(data);

            let mut text = format!("Meal plan for {} kcal:\n", format_kcal(calories));
            for meal in &plan.meals {
                text.push_str(&format_meal_line(meal));
            }
            bot.send_message(msg.chat.id, text).await?
        }
    };

    Ok(())
}

/// Plain messages advance the active assessment, if any.
async fn handle_free_text(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
    sessions: Sessions,
) -> ResponseResult<()> {
    let text = msg.text().unwrap_or("").trim();

    // A command that did not parse gets usage help, not an answer slot.
    if text.starts_with('/') {
        bot.send_message(
            msg.chat.id,
            format!("Unknown command.\n\n{}", Command::descriptions()),
        )
        .await?;
        return Ok(());
    }

    let mut guard = sessions.lock().await;
    let Some(session) = guard.get_mut(&msg.chat.id) else {
        drop(guard);
        bot.send_message(msg.chat.id, "Send /assess to start a nutrition assessment.")
            .await?;
        return Ok(());
    };

    if let Some(next) = session.record_answer(text) {
        let prompt = next.prompt();
        drop(guard);
        bot.send_message(msg.chat.id, prompt).await?;
        return Ok(());
    }

    // Flow complete: normalize once, run the pipeline, drop the session.
    let profile = session.profile();
    guard.remove(&msg.chat.id);
    drop(guard);

    let data = state.data.read().await;
    let mut rng = StdRng::from_entropy();
    let report = build_report(profile, state.formula, None, &data.foods, &mut rng);
    drop(data);

    bot.send_message(msg.chat.id, format_report(&report)).await?;
    Ok(())
}

// === Message formatting ===

/// Formats a kcal value with thousands separators ("1,752").
fn format_kcal(value: i32) -> String {
    let digits = value.abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0 { format!("-{out}") } else { out }
}

fn format_meal_line(meal: &crate::plan::PlannedMeal) -> String {
    let items: Vec<&str> = meal.items.iter().map(|i| i.name.as_str()).collect();
    format!(
        "\n{} ({} kcal): {}",
        meal.slot.display_name(),
        meal.calories,
        items.join(", ")
    )
}

fn format_report(report: &NutritionReport) -> String {
    let mut text = format!(
        "Assessment complete!\n\n\
         BMR: {} kcal\n\
         TDEE: {} kcal\n\
         Target: {} kcal ({})\n\n\
         Macros: P: {}g / C: {}g / F: {}g\n",
        format_kcal(report.energy.bmr),
        format_kcal(report.energy.tdee),
        format_kcal(report.target_calories),
        report.profile.primary_goal.display_name(),
        report.macros.protein_g,
        report.macros.carbs_g,
        report.macros.fat_g,
    );
    for meal in &report.plan.meals {
        text.push_str(&format_meal_line(meal));
    }
    text
}
