use super::{CommandInfo, MessageKey};

pub(super) const COMMANDS: &[CommandInfo] = &[
    CommandInfo { name: "start", description: "Comece a usar o assistente" },
    CommandInfo { name: "register", description: "Registre sua conta" },
    CommandInfo { name: "help", description: "Obtenha ajuda e exemplos" },
    CommandInfo { name: "balance", description: "Ver resumo financeiro" },
    CommandInfo { name: "reminders", description: "Mostrar lembretes pendentes" },
    CommandInfo { name: "profile", description: "Ver seu perfil" },
    CommandInfo { name: "upgrade", description: "Atualizar para Premium" },
    CommandInfo { name: "support", description: "Contatar suporte" },
];

pub(super) fn template(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    let text = match key {
        RegisterStart => concat!(
            "🚀 *Bem-vindo ao Registro do OkanAssist AI!*\n\n",
            "Preciso de alguns detalhes para criar sua conta.\n\n",
            "📧 *Por favor, insira seu endereço de e-mail:*\n",
            "(Isso será usado para vincular sua conta)\n\n",
            "Digite /cancel para parar o registro a qualquer momento."
        ),
        ValidateEmail => concat!(
            "❌ Por favor, insira um endereço de e-mail válido.\n",
            "Exemplo: seu.email@exemplo.com"
        ),
        RegisterFirstName => concat!(
            "✅ Email: {email}\n\n",
            "👤 *Qual é o seu primeiro nome?*\n",
            "(Digite /skip para usar: {first_name})"
        ),
        RegisterLastName => "👤 *Qual é o seu sobrenome?*\n(Digite /skip para continuar)",
        RegisterTimezone => concat!(
            "🕒 *Qual é o seu fuso horário?*\n\n",
            "Você pode dizer coisas como `Sou de São Paulo`, `Lisboa`, `horário do Pacífico` ou `GMT+2`.\n\n",
            "Isso é crucial para que os lembretes sejam precisos."
        ),
        RegisterConfirmation => concat!(
            "📋 *Por favor, confirme seus dados:*\n\n",
            "📧 Email: {email}\n",
            "👤 Nome: {first_name}"
        ),
        RegisterConfirmationWithTimezone => concat!(
            "\n🌐 Idioma: {language}\n",
            "🕒 Fuso horário: {timezone}  _(Vou interpretar automaticamente)_\n\n",
            "Digite /confirm para criar sua conta.\n\n\n",
            "Digite /cancel para começar novamente."
        ),
        InvalidConfirmation => {
            "❌ Resposta inválida. Por favor, digite /confirm para criar sua conta ou /cancel para começar novamente."
        }
        RegisterCancelled => {
            "❌ Registro cancelado. Você pode começar novamente a qualquer momento digitando /register."
        }
        RegistrationFailed => "❌ O registro falhou: {reason}",
        RegistrationError => {
            "❌ O registro falhou devido a um erro técnico. Por favor, tente novamente mais tarde."
        }
        PaymentSuccess => {
            "✅ Pagamento realizado com sucesso! Agora você tem acesso premium. Digite /profile para ver seu status."
        }
        PaymentFailure => {
            "❌ O pagamento falhou ou foi cancelado. Por favor, tente novamente com /upgrade ou entre em contato com o suporte se o problema persistir."
        }
        PortalReturn => concat!(
            "🔗 *Bem-vindo de volta ao OkanAssist!*\n\n",
            "Você retornou com sucesso do portal. Como posso te ajudar hoje?\n\n",
            "Digite /help para ver exemplos."
        ),
        GenericError => {
            "❌ Ocorreu um erro. Por favor, tente novamente mais tarde ou entre em contato com o suporte se o problema persistir."
        }
        GenericDowntime => {
            "⚠️ O serviço está enfrentando problemas. Por favor, tente novamente mais tarde ou entre em contato com o suporte se o problema persistir."
        }
        SupportPrompt => concat!(
            "🛠️ *Modo Suporte*\n\n",
            "Por favor, descreva seu problema em detalhes. Sua mensagem será enviada diretamente para nossa equipe de suporte.\n\n",
            "Digite /cancel para sair do modo suporte."
        ),
        SupportMessage => concat!(
            "💬 *Solicitação de Suporte Recebida*\n\n",
            "Obrigado por entrar em contato! Nossa equipe de suporte responderá o mais breve possível.\n\n",
            "Enquanto isso, você pode visitar nossa página de FAQ ou consultar /help para mais informações."
        ),
        SupportCancelled => "Solicitação de suporte cancelada.",
        SupportUnavailable => {
            "❌ Desculpe, o sistema de suporte está indisponível no momento. Por favor, tente novamente mais tarde."
        }
        HelpMessage => concat!(
            "🤖 *Ajuda do Bot OkanAssist*\n\n",
            "*💰 Transações*\n",
            "Você pode gerenciar suas finanças apenas conversando comigo!\n\n",
            "• *Registrar transações:* \"Gastei R$25 no almoço\", \"Recebi R$3000 de salário\"\n",
            "• *Obter resumos:* \"Mostre meus gastos deste mês\", \"Qual foi minha receita da semana passada?\"\n",
            "• *Gerar relatórios em PDF:* \"Preciso de um relatório de janeiro\", \"Gere um PDF das minhas transações do mês passado\"\n\n",
            "*⏰ Lembretes*\n",
            "Organize sua vida com lembretes inteligentes.\n\n",
            "• *Criar lembretes:* \"Lembre-me de pagar as contas amanhã às 15h\"\n",
            "• *Ver lembretes:* \"Mostre meus lembretes urgentes\", \"Quais são minhas tarefas para hoje?\"\n",
            "• *Concluir lembretes:* \"Marcar os lembretes de hoje como concluídos\", \"Limpar todos os lembretes\"\n\n",
            "*📄 Processamento de Documentos*\n",
            "• Envie uma foto de um recibo para registrar uma despesa automaticamente.\n",
            "• Envie um extrato bancário em PDF para importação de transações em massa.\n\n",
            "*🎯 Comandos*\n",
            "/start - Começar ou fazer login\n",
            "/register - Criar sua conta\n",
            "/help - Mostrar esta mensagem de ajuda\n",
            "/upgrade - Obter acesso ilimitado\n",
            "/profile - Ver seu perfil\n",
            "/support - Contatar suporte\n\n",
            "Apenas fale comigo naturalmente - eu entendo! 🎉"
        ),
        UserNotFound => "🔐 Usuário não encontrado. Por favor, registre-se primeiro digitando /register.\n",
        RegisterFirst => {
            "🔐 Você precisa se registrar primeiro para {feature}!\nDigite /register para criar sua conta."
        }
        ProfileInfo => concat!(
            "👤 *Seu Perfil*\n\n",
            "📧 Email: {email}\n",
            "👤 Nome: {name}\n",
            "🌐 Idioma: {language}\n",
            "💰 Moeda: {currency}\n",
            "⏰ Fuso horário: {timezone}\n",
            "🔗 URL da WebApp: {webapp_url}\n",
            "⭐ Premium: {premium_status}\n"
        ),
        ManageUrl => "🔗 Gerencie sua assinatura aqui: {url}",
        AudioProcessed => "✅ Áudio processado!",
        UnknownError => "Erro desconhecido",
    };
    Some(text)
}
