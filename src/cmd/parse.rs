use crate::domain::command::CommandPlan;

pub fn run(message: &[String]) -> CommandPlan {
    CommandPlan::from_message(&message.join(" "))
}
